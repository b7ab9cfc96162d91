use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Pong {
    pub message: Option<String>,
}
