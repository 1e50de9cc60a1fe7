use std::time::Duration;

use twilight_http::{
    api_error::ApiError,
    error::{Error as HttpError, ErrorType},
};

use super::RatelimitNotifier;

const REMAINING: &str = "x-ratelimit-remaining";
const RESET_AFTER: &str = "x-ratelimit-reset-after";

impl RatelimitNotifier {
    /// Signal the `retry_after` of a 429 response.
    pub fn inspect_error(&self, bucket: &str, err: &HttpError) {
        if let ErrorType::Response {
            error: ApiError::Ratelimited(ratelimited),
            ..
        } = err.kind()
        {
            if let Some(retry_after) = secs_to_duration(ratelimited.retry_after) {
                self.notify(bucket, retry_after);
            }
        }
    }

    /// Signal the reset of an exhausted ratelimit.
    pub fn inspect_headers<'h, I>(&self, bucket: &str, headers: I)
    where
        I: IntoIterator<Item = (&'h str, &'h [u8])>,
    {
        if let Some(retry_after) = exhausted_reset_after(headers) {
            self.notify(bucket, retry_after);
        }
    }
}

fn exhausted_reset_after<'h, I>(headers: I) -> Option<Duration>
where
    I: IntoIterator<Item = (&'h str, &'h [u8])>,
{
    let mut remaining = None;
    let mut reset_after = None;

    for (name, value) in headers {
        let Ok(value) = std::str::from_utf8(value) else {
            continue;
        };

        if name.eq_ignore_ascii_case(REMAINING) {
            remaining = value.parse::<u64>().ok();
        } else if name.eq_ignore_ascii_case(RESET_AFTER) {
            reset_after = value.parse::<f64>().ok();
        }
    }

    match (remaining, reset_after) {
        (Some(0), Some(secs)) if secs > 0.0 => secs_to_duration(secs),
        _ => None,
    }
}

/// `None` for negative, non-finite or overflowing values.
fn secs_to_duration(secs: f64) -> Option<Duration> {
    if !secs.is_finite() {
        return None;
    }

    Duration::try_from_secs_f64(secs).ok()
}
