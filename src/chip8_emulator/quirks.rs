use std::env;

/// Behaviour that differs between CHIP-8 interpreters and is left selectable.
///
/// Only the shift source register is configurable. Every other instruction has
/// a single fixed meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chip8Quirks {
    /// `8xy6`/`8xyE` shift Vy into Vx instead of shifting Vx in place.
    pub shift_uses_vy: bool,
}

pub const ORIGINAL_QUIRKS: Chip8Quirks = Chip8Quirks {
    shift_uses_vy: true,
};

pub const MODERN_QUIRKS: Chip8Quirks = Chip8Quirks {
    shift_uses_vy: false,
};

impl Default for Chip8Quirks {
    fn default() -> Self {
        MODERN_QUIRKS
    }
}

pub fn load_quirks_profile(profile: &str) -> Result<Chip8Quirks, String> {
    match profile.trim().to_ascii_lowercase().as_str() {
        "original" => Ok(ORIGINAL_QUIRKS),
        "modern" => Ok(MODERN_QUIRKS),
        other => Err(format!(
            "invalid CHIP8_QUIRKS '{other}', expected one of: modern, original"
        )),
    }
}

pub fn load_quirks_profile_from_env() -> Result<(String, Chip8Quirks), String> {
    let profile = env::var("CHIP8_QUIRKS").unwrap_or_else(|_| "modern".to_owned());
    let normalized = profile.trim().to_ascii_lowercase();
    let quirks = load_quirks_profile(&normalized)?;
    Ok((normalized, quirks))
}
