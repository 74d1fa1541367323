//! Auflösung freier Control-Namen zu [`ControlRef`]s
//!
//! Akzeptiert Xbox- und PlayStation-Namen, D-Pad- und Stick-Phrasen sowie die
//! Namen, die die Legacy-Migration erzeugt. Groß-/Kleinschreibung, Leerzeichen,
//! Bindestriche und Unterstriche spielen keine Rolle.

use crate::mapping::model::{AxisDirection, ControlRef};

/// Stick-Phrasen mit ihrer X- und Y-Achse
const STICKS: [(&[&str], usize, usize); 2] = [
    (&["leftstick", "ls"], 0, 1),
    (&["rightstick", "rs"], 2, 3),
];

/// Löst einen Control-Namen auf, `None` wenn er keinem bekannten Control entspricht
pub fn resolve(input: &str) -> Option<ControlRef> {
    let normalized = normalize(input);

    if let Some(index) = button_index(&normalized) {
        return Some(ControlRef::Button { index });
    }

    generic_control(input).or_else(|| stick_axis(&normalized))
}

fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn button_index(normalized: &str) -> Option<usize> {
    let index = match normalized {
        "a" | "cross" => 0,
        "b" | "circle" => 1,
        "x" | "square" => 2,
        "y" | "triangle" => 3,
        "lb" | "l1" => 4,
        "rb" | "r1" => 5,
        "lt" | "l2" => 6,
        "rt" | "r2" => 7,
        "select" | "share" | "back" | "view" | "sel" => 8,
        "start" | "options" | "menu" | "sta" => 9,
        "l3" | "leftstickclick" => 10,
        "r3" | "rightstickclick" => 11,
        "up" | "dpadup" | "↑" => 12,
        "down" | "dpaddown" | "↓" => 13,
        "left" | "dpadleft" | "←" => 14,
        "right" | "dpadright" | "→" => 15,
        "home" | "guide" | "ps" | "h" => 16,
        _ => return None,
    };
    Some(index)
}

/// `Button {n}` und `Axis {n} -`/`Axis {n} +`
///
/// Das Vorzeichen muss vor dem Normalisieren gelesen werden, weil `-` dort entfernt wird.
fn generic_control(input: &str) -> Option<ControlRef> {
    let compact: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect();

    if let Some(digits) = compact.strip_prefix("button") {
        return digits
            .parse()
            .ok()
            .map(|index| ControlRef::Button { index });
    }

    let rest = compact.strip_prefix("axis")?;
    let (digits, direction) = if let Some(digits) = rest.strip_suffix('-') {
        (digits, AxisDirection::Negative)
    } else if let Some(digits) = rest.strip_suffix('+') {
        (digits, AxisDirection::Positive)
    } else {
        return None;
    };
    digits
        .parse()
        .ok()
        .map(|index| ControlRef::Axis { index, direction })
}

fn stick_axis(normalized: &str) -> Option<ControlRef> {
    for (phrases, x_axis, y_axis) in STICKS {
        for phrase in phrases {
            let Some(position) = normalized.find(phrase) else {
                continue;
            };
            // Die Richtung nur im Rest suchen, "leftstick" enthält selbst "left"
            let rest = format!(
                "{}{}",
                &normalized[..position],
                &normalized[position + phrase.len()..]
            );
            if let Some(control) = stick_direction(&rest, x_axis, y_axis) {
                return Some(control);
            }
        }
    }
    None
}

fn stick_direction(rest: &str, x_axis: usize, y_axis: usize) -> Option<ControlRef> {
    let (index, direction) = if rest.contains("left") {
        (x_axis, AxisDirection::Negative)
    } else if rest.contains("right") {
        (x_axis, AxisDirection::Positive)
    } else if rest.contains("up") {
        (y_axis, AxisDirection::Negative)
    } else if rest.contains("down") {
        (y_axis, AxisDirection::Positive)
    } else {
        return None;
    };
    Some(ControlRef::Axis { index, direction })
}
