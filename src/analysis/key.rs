use crate::types::Mode;

const PITCH_NAMES: [&str; 12] = [
    "C", "C♯/D♭", "D", "D♯/E♭", "E", "F", "F♯/G♭", "G", "G♯/A♭", "A", "A♯/B♭", "B",
];

const CAMELOT_MAJOR: [&str; 12] = [
    "8B", "3B", "10B", "5B", "12B", "7B", "2B", "9B", "4B", "11B", "6B", "1B",
];

const CAMELOT_MINOR: [&str; 12] = [
    "5A", "12A", "7A", "2A", "9A", "4A", "11A", "6A", "1A", "8A", "3A", "10A",
];

fn pitch_index(pitch_class: Option<i32>) -> Option<usize> {
    pitch_class
        .filter(|pc| (0..12).contains(pc))
        .map(|pc| pc as usize)
}

/// Human-readable key name, e.g. `"A Minor"`.
///
/// The provider's `-1` sentinel, a missing value or anything outside `0..=11`
/// yields `"Unknown"`. An unknown mode leaves the mode suffix off.
pub fn key_name(pitch_class: Option<i32>, mode: Mode) -> String {
    let Some(index) = pitch_index(pitch_class) else {
        return "Unknown".to_string();
    };

    match mode {
        Mode::Major => format!("{} Major", PITCH_NAMES[index]),
        Mode::Minor => format!("{} Minor", PITCH_NAMES[index]),
        Mode::Unknown => PITCH_NAMES[index].to_string(),
    }
}

/// Camelot-wheel code for a key, e.g. `"8B"` for C major.
pub fn camelot_key(pitch_class: Option<i32>, mode: Mode) -> Option<&'static str> {
    let index = pitch_index(pitch_class)?;
    match mode {
        Mode::Major => Some(CAMELOT_MAJOR[index]),
        Mode::Minor => Some(CAMELOT_MINOR[index]),
        Mode::Unknown => None,
    }
}

/// Coarse harmonic-mixing check between two keys.
///
/// Compatible when the keys are identical, when they are a relative
/// major/minor pair (3 or 9 semitones apart with different modes), or when
/// they share the pitch class in any mode (parallel keys). An unknown or
/// out-of-range pitch class is never compatible with anything.
pub fn are_keys_compatible(pitch_class1: i32, mode1: Mode, pitch_class2: i32, mode2: Mode) -> bool {
    let (Some(index1), Some(index2)) = (
        pitch_index(Some(pitch_class1)),
        pitch_index(Some(pitch_class2)),
    ) else {
        return false;
    };

    if index1 == index2 && mode1 == mode2 {
        return true;
    }

    let distance = index1.abs_diff(index2);
    let known_modes = mode1 != Mode::Unknown && mode2 != Mode::Unknown;
    if known_modes && mode1 != mode2 && (distance == 3 || distance == 9) {
        return true;
    }

    // parallel keys
    index1 == index2
}
