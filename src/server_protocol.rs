use serde_json::{json, Value};

use crate::types::{Direction, GameConfig, GameSummary, MazeInit, Snapshot};

#[derive(Debug, PartialEq)]
pub enum ParsedClientMessage {
    Input { dir: Direction },
    Swipe { dir: Direction },
    Restart { seed: Option<u32> },
    Ping { t: f64 },
}

pub fn parse_client_message(raw: &str) -> Option<ParsedClientMessage> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    let message_type = object.get("type")?.as_str()?;

    match message_type {
        "input" => {
            // Either a named direction or a raw unit vector. Neither may stop the player.
            let dir = match object.get("dir") {
                Some(value) => Direction::parse_move(value.as_str()?)?,
                None => {
                    let dx = object.get("dx")?.as_i64()?;
                    let dy = object.get("dy")?.as_i64()?;
                    Direction::from_vector(i32::try_from(dx).ok()?, i32::try_from(dy).ok()?)?
                }
            };
            if !dir.is_move() {
                return None;
            }
            Some(ParsedClientMessage::Input { dir })
        }
        "swipe" => {
            let dx = object.get("dx")?.as_f64()?;
            let dy = object.get("dy")?.as_f64()?;
            let dir = Direction::from_swipe(dx as f32, dy as f32)?;
            Some(ParsedClientMessage::Swipe { dir })
        }
        "restart" => {
            let seed = parse_optional_seed(object.get("seed"))?;
            Some(ParsedClientMessage::Restart { seed })
        }
        "ping" => {
            let t = object.get("t")?.as_f64()?;
            if !t.is_finite() {
                return None;
            }
            Some(ParsedClientMessage::Ping { t })
        }
        _ => None,
    }
}

/// Whole numbers in `u32` range; fractional values are floored.
fn parse_optional_seed(value: Option<&Value>) -> Option<Option<u32>> {
    let Some(value) = value else {
        return Some(None);
    };
    if value.is_null() {
        return Some(None);
    }
    if let Some(number) = value.as_u64() {
        return u32::try_from(number).ok().map(Some);
    }
    let number = value.as_f64()?;
    if !number.is_finite() {
        return None;
    }
    let floored = number.floor();
    if floored < 0.0 || floored > u32::MAX as f64 {
        return None;
    }
    Some(Some(floored as u32))
}

pub fn init_message(init: &MazeInit, config: &GameConfig) -> Value {
    json!({
        "type": "init",
        "maze": init,
        "config": config,
    })
}

pub fn state_message(snapshot: &Snapshot) -> Value {
    json!({
        "type": "state",
        "snapshot": snapshot,
    })
}

pub fn game_over_message(summary: &GameSummary) -> Value {
    json!({
        "type": "game_over",
        "summary": summary,
    })
}

pub fn pong_message(t: f64, server_ms: u64) -> Value {
    json!({
        "type": "pong",
        "t": t,
        "serverMs": server_ms,
    })
}

pub fn error_message(message: &str) -> Value {
    json!({
        "type": "error",
        "message": message,
    })
}
