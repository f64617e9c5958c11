use std::error::Error;
use std::time::{Duration, Instant};

use backoff::ExponentialBackoffBuilder;
use log::{debug, warn};
use reqwest::blocking::{Client, Response};

use crate::core::{GenericError, GenericResult};

pub fn new_client(timeout: Duration) -> GenericResult<Client> {
    Ok(Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?)
}

/// Sends GET request retrying network errors and server errors until `max_retry_time` elapses.
///
/// Responses with any other status are returned as is: their interpretation is up to the caller.
pub fn send_request<U: AsRef<str>>(client: &Client, url: U, max_retry_time: Duration) -> GenericResult<Response> {
    let url = url.as_ref();

    let backoff = ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(max_retry_time))
        .build();

    let mut attempt = 0;

    let result = backoff::retry(backoff, || {
        attempt += 1;

        debug!("Sending request to {url}...");
        let start = Instant::now();

        let result = send(client, url);
        let duration = start.elapsed();

        match result {
            Ok(response) => {
                debug!("Got response from {url} ({duration:?}).");
                Ok(response)
            },
            Err(err) => {
                warn!("Request to {url} has failed (attempt #{attempt}): {err}.");
                Err(backoff::Error::transient(err))
            },
        }
    });

    result.map_err(|err| match err {
        backoff::Error::Permanent(err) | backoff::Error::Transient {err, ..} => err,
    })
}

fn send(client: &Client, url: &str) -> GenericResult<Response> {
    let response = client.get(url).send().map_err(humanize_error)?;

    let status = response.status();
    if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err!("Server returned an error: {}", status);
    }

    Ok(response)
}

// reqwest errors are too laconic without their causes
fn humanize_error(err: reqwest::Error) -> GenericError {
    let mut message = err.to_string();

    let mut source = err.source();
    while let Some(err) = source {
        message = format!("{message}: {err}");
        source = err.source();
    }

    message.into()
}
