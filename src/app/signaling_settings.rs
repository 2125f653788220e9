use crate::{
    config::Config, core::session_error::SessionError,
    signaling_client::protocol::SignalingContext,
};

const SIGNALING_SECTION: &str = "Signaling";

impl SignalingContext {
    /// Reads `[Signaling] Url`, `SigKey` and `RoomId`, falling back to globals
    /// of the same name.
    ///
    /// # Errors
    /// `Configuration` naming the first missing or empty key.
    pub fn from_config(config: &Config) -> Result<Self, SessionError> {
        let get = |key: &'static str| {
            config
                .get_non_empty_or_global(SIGNALING_SECTION, key)
                .ok_or_else(|| SessionError::Configuration(key.into()))
        };
        Self::new(get("Url")?, get("SigKey")?, get("RoomId")?)
            .map_err(|key| SessionError::Configuration(key.into()))
    }
}
