//! Wheel layout
//!
//! Pure: rotation and outcomes in, draw commands out. No timing, randomness
//! or gate state lives here.

use std::f64::consts::TAU;

use super::commands::{DrawCommand, colors};
use super::viewport::Viewport;
use crate::wheel::{OutcomeSet, Slice};

pub const BORDER_WIDTH: f64 = 2.0;
pub const HUB_RADIUS: f64 = 32.0;
pub const LABEL_FONT: &str = "14px sans-serif";
/// Label anchor inset from the rim
pub const LABEL_INSET: f64 = 16.0;
/// Baseline drop so text sits on the wedge's center line
pub const LABEL_BASELINE: f64 = 6.0;

/// Cut a label to `max_chars` characters, marking the cut with an ellipsis
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    match label.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &label[..cut]),
        None => label.to_string(),
    }
}

/// Draw the wheel rotated by `angle` radians
pub fn render(
    angle: f64,
    outcomes: &OutcomeSet,
    viewport: &Viewport,
    label_max_chars: usize,
) -> Vec<DrawCommand> {
    let center = viewport.center();
    let radius = viewport.wheel_radius();
    let n = outcomes.len();

    let mut commands = Vec::with_capacity(3 + n * 2);
    commands.push(DrawCommand::SetScale(viewport.device_pixel_ratio));
    commands.push(DrawCommand::Clear {
        width: viewport.width,
        height: viewport.height,
    });

    if n > 0 {
        let slice = TAU / n as f64;
        for (i, outcome) in outcomes.iter().enumerate() {
            let (start, end) = Slice::new(i, n).rotated(angle);

            commands.push(DrawCommand::Wedge {
                center,
                radius,
                start,
                end,
                fill: if i % 2 == 0 {
                    colors::WEDGE_EVEN
                } else {
                    colors::WEDGE_ODD
                },
                stroke: colors::BORDER,
                line_width: BORDER_WIDTH,
            });

            commands.push(DrawCommand::Label {
                center,
                angle: start + slice / 2.0,
                offset: glam::DVec2::new(radius - LABEL_INSET, LABEL_BASELINE),
                text: truncate_label(outcome.short_label(), label_max_chars),
                font: LABEL_FONT,
                fill: colors::LABEL,
            });
        }
    }

    commands.push(DrawCommand::Circle {
        center,
        radius: HUB_RADIUS,
        fill: colors::HUB,
        stroke: colors::BORDER,
        line_width: BORDER_WIDTH,
    });

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn wedges(commands: &[DrawCommand]) -> Vec<(f64, f64)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Wedge { start, end, .. } => Some((*start, *end)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Thank you.", 18), "Thank you.");
        assert_eq!(truncate_label("exactly eighteen c", 18), "exactly eighteen c");
        assert_eq!(
            truncate_label("“Well done — appreciated.”", 18),
            "“Well done — appre…"
        );
    }

    #[test]
    fn test_wedges_follow_rotation() {
        let outcomes = OutcomeSet::from_labels(["a", "b", "c", "d"]).unwrap();
        let commands = render(0.5, &outcomes, &Viewport::default(), 18);
        let w = wedges(&commands);
        assert_eq!(w.len(), 4);
        for (i, (start, end)) in w.iter().enumerate() {
            assert!((start - (0.5 + i as f64 * PI / 2.0)).abs() < 1e-12);
            assert!((end - start - PI / 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_alternating_fill_and_hub_last() {
        let commands = render(0.0, &OutcomeSet::curated(), &Viewport::default(), 18);
        let fills: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Wedge { fill, .. } => Some(*fill),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 12);
        assert!(fills.iter().step_by(2).all(|f| *f == colors::WEDGE_EVEN));
        assert!(fills.iter().skip(1).step_by(2).all(|f| *f == colors::WEDGE_ODD));
        assert!(matches!(
            commands.last(),
            Some(DrawCommand::Circle { radius, .. }) if *radius == HUB_RADIUS
        ));
    }

    #[test]
    fn test_labels_are_short_and_anchored_near_rim() {
        let viewport = Viewport::new(400.0, 300.0, 1.0);
        let commands = render(0.0, &OutcomeSet::curated(), &viewport, 18);
        let labels: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { text, offset, .. } => Some((text.clone(), *offset)),
                _ => None,
            })
            .collect();
        assert_eq!(labels[0].0, "Midnight Patron");
        assert_eq!(labels[0].1.x, 140.0 - LABEL_INSET);
        assert!(labels.iter().all(|(t, _)| !t.starts_with("Message: ")));
    }

    #[test]
    fn test_dpr_changes_scale_only() {
        let outcomes = OutcomeSet::curated();
        let sd = render(1.0, &outcomes, &Viewport::new(360.0, 360.0, 1.0), 18);
        let hd = render(1.0, &outcomes, &Viewport::new(360.0, 360.0, 3.0), 18);
        assert_eq!(hd[0], DrawCommand::SetScale(3.0));
        assert_eq!(sd[1..], hd[1..]);
    }
}
