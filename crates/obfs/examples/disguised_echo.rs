//! A disguised echo server.
//!
//! Every connection is wrapped in the HTTP/1.1 disguise codec: inbound
//! payload hidden in a disguised request echoes back inside what looks like
//! an ordinary `200 OK` response. A peer that never sends HTTP gets its
//! bytes echoed verbatim.

use futures::{SinkExt, StreamExt};
use http_disguise::codec::{Disguise, DisguiseCodec};
use tokio::net::TcpListener;
use tokio_util::codec::Framed;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let listener = match TcpListener::bind("127.0.0.1:8080").await {
        Ok(listener) => listener,
        Err(e) => {
            error!(cause = %e, "bind error");
            return;
        }
    };
    info!(port = 8080, "disguised echo server listening");

    loop {
        let (stream, remote_addr) = match listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                error!(cause = %e, "failed to accept");
                continue;
            }
        };

        tokio::spawn(async move {
            let codec = DisguiseCodec::from_name("http_simple").expect("known variant");
            info!(%remote_addr, method = codec.method(), "connection established");

            let mut framed = Framed::new(stream, codec);
            while let Some(result) = framed.next().await {
                match result {
                    Ok(payload) => {
                        if let Err(e) = framed.send(payload).await {
                            error!(%remote_addr, cause = %e, "send error");
                            break;
                        }
                    }
                    Err(e) => {
                        error!(%remote_addr, cause = %e, "decode error");
                        break;
                    }
                }
            }
            info!(%remote_addr, "connection closed");
        });
    }
}
