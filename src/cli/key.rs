use crate::{
    analysis::{are_keys_compatible, camelot_key, key_name},
    info, success,
    types::Mode,
    warning,
};

pub fn key(pitch_class: i32, mode: Mode, compare: Option<(i32, Mode)>) {
    info!(
        "{} ({})",
        key_name(Some(pitch_class), mode),
        camelot_key(Some(pitch_class), mode).unwrap_or("no Camelot code")
    );

    let Some((other_pitch_class, other_mode)) = compare else {
        return;
    };

    info!(
        "{} ({})",
        key_name(Some(other_pitch_class), other_mode),
        camelot_key(Some(other_pitch_class), other_mode).unwrap_or("no Camelot code")
    );

    if are_keys_compatible(pitch_class, mode, other_pitch_class, other_mode) {
        success!("Keys are compatible for mixing.");
    } else {
        warning!("Keys are not compatible for mixing.");
    }
}
