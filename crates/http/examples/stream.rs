//! Prints a streaming JSON endpoint to the console.
//!
//! ```text
//! CIRCLE_AUTHORIZATION='OAuth ...' cargo run --example stream -- stream.twitter.com /1.1/statuses/sample.json
//! ```
//!
//! The `Authorization` value comes from an OAuth signer outside this crate and is sent
//! verbatim. Whenever the stream ends the demo waits a moment and reconnects with a
//! fresh connection and engine.

use std::env;
use std::time::Duration;

use circle_http::client::HttpClient;
use circle_http::connection::{Connection, Endpoint, TlsContext};
use circle_http::handler::{Delivery, make_handler};
use circle_http::protocol::Response;
use circle_json::Value;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut args = env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "stream.twitter.com".to_string());
    let path = args.next().unwrap_or_else(|| "/1.1/statuses/sample.json".to_string());
    let query = args.next().unwrap_or_default();
    let authorization = env::var("CIRCLE_AUTHORIZATION").ok();

    let tls = TlsContext::webpki();
    let endpoint = Endpoint::https(host);

    loop {
        let connection = match Connection::establish(&endpoint, Some(&tls)).await {
            Ok(connection) => connection,
            Err(e) => {
                error!(%endpoint, cause = %e, "can't connect, retrying");
                tokio::time::sleep(RECONNECT_DELAY).await;
                continue;
            }
        };

        let mut client = HttpClient::new(connection).path(&path).query(&query);
        if let Some(authorization) = &authorization {
            client = client.header("Authorization", authorization);
        }
        info!(uri = client.uri(), "start streaming");

        let handle = client.start(make_handler(|delivery| async move {
            match delivery {
                Delivery::Message(response) => print_message(&response),
                Delivery::End(end) if end.is_eof() => info!("stream closed by peer"),
                Delivery::End(end) => warn!(%end, "stream ended abnormally"),
            }
        }));

        if let Err(e) = handle.request() {
            error!(cause = %e, "can't send request");
        }
        handle.join().await;

        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

fn print_message(response: &Response) {
    if !response.status().is_success() {
        warn!(status = response.status().code(), reason = response.status().reason(), "unexpected status");
    }

    let body = response.body();
    // keep-alive chunks are bare newlines
    if body.iter().all(u8::is_ascii_whitespace) {
        return;
    }

    match circle_json::parse(body) {
        Ok(value) => match value.get("text").and_then(Value::as_str) {
            Some(text) => println!("{text}"),
            None => println!("{value:?}"),
        },
        Err(e) => {
            warn!(cause = %e, "body is not json");
            println!("{}", String::from_utf8_lossy(body));
        }
    }
}
