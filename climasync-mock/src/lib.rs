use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use ::time::OffsetDateTime;
use tokio::time;

use crate::settings::Settings;
use crate::simulate::{FloorNode, day_fraction, parse_command_line};

pub mod settings;
mod simulate;

#[derive(Serialize, Deserialize, Debug)]
pub struct SensorPayload {
    temp: f64,
    hum: f64,
}

pub async fn run(settings: &Arc<Settings>) -> Result<(), Box<dyn Error>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let noise = Normal::new(0.0, settings.simulation.noise)?;

    let mut nodes: Vec<FloorNode> = settings
        .simulation
        .floors
        .iter()
        .map(FloorNode::new)
        .collect();

    tracing::info!(
        "simulating {} floor node(s) against {}",
        nodes.len(),
        settings.target.url
    );

    let mut interval = time::interval(Duration::from_secs(settings.simulation.interval_secs));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let fraction = day_fraction(OffsetDateTime::now_utc());

                for node in nodes.iter_mut() {
                    node.step();
                    let (temp, hum) = node.sample(fraction, &noise, &mut rand::rng());

                    match push_reading(&client, &settings.target.url, &node.floor, SensorPayload { temp, hum }).await {
                        Ok(reply) => {
                            tracing::debug!("{} <- {}", node.floor, reply);
                            node.apply(parse_command_line(&reply));
                        }
                        Err(e) => tracing::warn!("push to {} failed: {}", node.floor, e),
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("stopping simulation");
                return Ok(());
            }
        }
    }
}

async fn push_reading(
    client: &reqwest::Client,
    base_url: &str,
    floor: &str,
    payload: SensorPayload,
) -> Result<String, reqwest::Error> {
    tracing::debug!("Send {}: {:?}", floor, payload);

    client
        .post(format!("{base_url}/{floor}"))
        .json(&payload)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}
