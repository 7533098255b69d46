//! Named coefficient sets.

/// Belousov-Zhabotinsky (alpha, beta, gamma).
pub const BZ_DEFAULT: [f64; 3] = [1.0, 1.0, 1.0];

/// FitzHugh-Nagumo (a, b).
pub const FITZHUGH_NAGUMO_DEFAULT: [f64; 2] = [-0.005, 10.0];

/// Cahn-Hilliard (a).
pub const CAHN_HILLIARD_DEFAULT: [f64; 1] = [0.05];

// Gray-Scott (feed, kill) pairs.
pub const GRAY_SCOTT_DEFAULT: (f64, f64) = (0.0374, 0.0584);
pub const BRAIN_CORAL: (f64, f64) = (0.0545, 0.062);
pub const MITOSIS: (f64, f64) = (0.0367, 0.0649);
pub const CORAL_GROWTH: (f64, f64) = (0.037, 0.060);
pub const MAZE: (f64, f64) = (0.029, 0.057);
pub const SOLITONS: (f64, f64) = (0.030, 0.062);
pub const WORMS: (f64, f64) = (0.078, 0.061);
pub const SPOTS: (f64, f64) = (0.035, 0.065);
pub const CHAOS: (f64, f64) = (0.026, 0.051);
pub const MOVING_SPOTS: (f64, f64) = (0.014, 0.054);

/// Looks up a Gray-Scott preset by name, ignoring case and separators.
pub fn gray_scott_preset(name: &str) -> Option<(f64, f64)> {
    let key: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let preset = match key.as_str() {
        "default" => GRAY_SCOTT_DEFAULT,
        "braincoral" => BRAIN_CORAL,
        "mitosis" => MITOSIS,
        "coral" | "coralgrowth" => CORAL_GROWTH,
        "maze" => MAZE,
        "solitons" => SOLITONS,
        "worms" => WORMS,
        "spots" => SPOTS,
        "chaos" => CHAOS,
        "movingspots" => MOVING_SPOTS,
        _ => return None,
    };

    Some(preset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lookup() {
        assert_eq!(Some(BRAIN_CORAL), gray_scott_preset("brain-coral"));
        assert_eq!(Some(MOVING_SPOTS), gray_scott_preset("Moving Spots"));
        assert_eq!(None, gray_scott_preset("plaid"));
    }
}
