use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub cooldown_secs: u64,
}

#[derive(Serialize)]
pub struct NetworkStatus {
    pub name: String,
    pub chain_id: String,
    pub faucet_address: String,
    pub amount_to_send: u64,
    pub tx_fee: u64,
    pub daily_cap: u64,
    pub denom: String,
    pub active_day: Option<NaiveDate>,
    pub day_tally: u64,
    pub active_cooldowns: usize,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        cooldown_secs: state.config.cooldown_secs,
    })
}

pub async fn get_networks(State(state): State<AppState>) -> Json<Vec<NetworkStatus>> {
    let faucet = &state.faucet;
    let statuses = faucet
        .registry()
        .iter()
        .map(|network| {
            let usage = faucet.engine().usage(&network.name);
            NetworkStatus {
                name: network.name.clone(),
                chain_id: network.chain_id.clone(),
                faucet_address: network.faucet_address.clone(),
                amount_to_send: network.amount_to_send,
                tx_fee: network.tx_fee,
                daily_cap: network.daily_cap,
                denom: network.denom.clone(),
                active_day: usage.as_ref().map(|u| u.active_day),
                day_tally: usage.as_ref().map_or(0, |u| u.day_tally),
                active_cooldowns: usage.as_ref().map_or(0, |u| u.active_cooldowns),
            }
        })
        .collect();

    Json(statuses)
}
