use bevy::prelude::*;
use rand::Rng;

use crate::resources::{Wind, WindConfig};

/// System that recomputes the wind from total elapsed time.
///
/// Elapsed time is the single input; nothing accumulates across ticks, so a
/// dropped frame cannot skew the cycle. Runs first in the fixed schedule so
/// every force computation in the same tick sees the fresh wind.
pub fn wind_system(mut wind: ResMut<Wind>, config: Res<WindConfig>, time: Res<Time>) {
    if !config.auto_cycle {
        return;
    }
    let jitter = if config.jitter > 0.0 {
        rand::thread_rng().gen_range(-config.jitter..=config.jitter)
    } else {
        0.0
    };
    *wind = Wind::sample(&config, time.elapsed().as_millis(), jitter);
}
