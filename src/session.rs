//! Interactive forecast session.
//!
//! One iteration walks prompt-date, prompt-city, resolve, lookup-or-fetch,
//! interpret, persist, prompt-continue. A fetch failure restarts the
//! iteration; an interpretation failure does not stop persistence. Reader
//! and writer are injected so the loop is testable with in-memory buffers.

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};

use raincheck_weather::{ForecastCache, ForecastProvider, Geocoder, RainReport};

const DATE_PROMPT: &str = "Enter date (YYYY-mm-dd) or leave blank for tomorrow: ";
const CITY_PROMPT: &str = "Enter city name or leave blank for default location: ";
const CONTINUE_PROMPT: &str = "Do you want to check another date (yes/no)? ";

pub struct Session {
    cache: ForecastCache,
    geocoder: Geocoder,
    provider: ForecastProvider,
}

impl Session {
    pub fn new(cache: ForecastCache, geocoder: Geocoder, provider: ForecastProvider) -> Self {
        Self {
            cache,
            geocoder,
            provider,
        }
    }

    /// Run the prompt loop until the user declines to continue or input
    /// reaches end-of-file.
    ///
    /// # Errors
    /// Only console IO failures abort the session; network and cache
    /// problems are reported to the user and the loop carries on.
    pub async fn run<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<()> {
        loop {
            let Some(date) = prompt_date(input, output)? else {
                break;
            };
            let Some(city) = prompt(input, output, CITY_PROMPT)? else {
                break;
            };

            // The coordinate is resolved up front even when the lookup ends
            // up hitting the cache; it only feeds the fetch branch.
            let coordinate = self.geocoder.resolve(&city).await;
            let key = date.to_string();

            let forecast = match self.cache.get(&key) {
                Some(cached) => {
                    writeln!(output, "Using cached data...")?;
                    cached.clone()
                }
                None => match self.provider.fetch(coordinate, date).await {
                    Ok(fresh) => fresh,
                    Err(e) => {
                        tracing::debug!("Forecast fetch for {} failed: {}", key, e);
                        writeln!(output, "API request failed.")?;
                        continue;
                    }
                },
            };

            match RainReport::from_response(&forecast) {
                Ok(report) => writeln!(output, "{}", report.message())?,
                Err(e) => {
                    tracing::debug!("Forecast for {} not interpretable: {}", key, e);
                    writeln!(output, "Unexpected data format.")?;
                }
            }

            // Persist even on cache hits and interpretation failures; the
            // failed-fetch path above never reaches this point.
            if let Err(e) = self.cache.append(&key, &forecast) {
                tracing::error!("Could not persist forecast for {}: {}", key, e);
            }

            let Some(answer) = prompt(input, output, CONTINUE_PROMPT)? else {
                break;
            };
            if !answer.trim().eq_ignore_ascii_case("yes") {
                break;
            }
        }

        Ok(())
    }
}

/// Prompt for a date until one parses. Empty input means tomorrow.
/// `None` means end-of-file.
fn prompt_date<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Option<NaiveDate>> {
    loop {
        let Some(raw) = prompt(input, output, DATE_PROMPT)? else {
            return Ok(None);
        };

        if raw.is_empty() {
            return Ok(Some(Local::now().date_naive() + Duration::days(1)));
        }
        match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => return Ok(Some(date)),
            Err(_) => writeln!(
                output,
                "Invalid date format. Please enter the date in YYYY-mm-dd format."
            )?,
        }
    }
}

/// Write a prompt and read one line, without its trailing newline.
/// `None` means end-of-file.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> Result<Option<String>> {
    write!(output, "{}", message)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
