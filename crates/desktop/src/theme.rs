use iced::theme::Palette;
use iced::widget::{button, container};
use iced::{color, Background, Border, Color, Shadow, Theme, Vector};

/// Window colour when no background image is available.
pub const WINDOW_BACKGROUND: Color = Color::from_rgb(0.118, 0.118, 0.118);

const TOGGLE_BUTTON: Color = Color::from_rgb(0.267, 0.278, 0.353);
const SNAPSHOT_BUTTON: Color = Color::from_rgb(0.384, 0.447, 0.643);
const TITLE_GLOW: Color = Color::from_rgb(0.0, 0.616, 1.0);

pub fn eye_see_theme() -> Theme {
    Theme::custom(
        "Eye See",
        Palette {
            background: WINDOW_BACKGROUND,
            text: Color::WHITE,
            primary: TITLE_GLOW,
            success: color!(0x00, 0xff, 0x00),
            warning: color!(0xff, 0xcc, 0x00),
            danger: color!(0xff, 0x45, 0x3a),
        },
    )
}

/// Translucent rounded panel behind the logo and title.
pub fn title_bar(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color::from_rgba8(0, 0, 0, 0.6))),
        border: Border {
            radius: 15.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    }
}

/// White rounded frame around the live video.
pub fn video_frame(_theme: &Theme) -> container::Style {
    container::Style {
        border: Border {
            color: Color::WHITE,
            width: 3.0,
            radius: 10.0.into(),
        },
        ..container::Style::default()
    }
}

pub fn solid_background(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(WINDOW_BACKGROUND)),
        ..container::Style::default()
    }
}

pub fn toggle_button(_theme: &Theme, status: button::Status) -> button::Style {
    action_button(TOGGLE_BUTTON, status)
}

pub fn snapshot_button(_theme: &Theme, status: button::Status) -> button::Style {
    action_button(SNAPSHOT_BUTTON, status)
}

fn action_button(base: Color, status: button::Status) -> button::Style {
    let background = match status {
        button::Status::Hovered => lighten(base, 0.1),
        button::Status::Pressed => lighten(base, -0.1),
        _ => base,
    };
    button::Style {
        background: Some(Background::Color(background)),
        text_color: Color::WHITE,
        border: Border {
            radius: 6.0.into(),
            ..Border::default()
        },
        shadow: Shadow {
            color: Color::from_rgba(1.0, 1.0, 1.0, 0.4),
            offset: Vector::new(0.0, 0.0),
            blur_radius: 15.0,
        },
        ..button::Style::default()
    }
}

fn lighten(c: Color, amount: f32) -> Color {
    Color {
        r: (c.r + amount).clamp(0.0, 1.0),
        g: (c.g + amount).clamp(0.0, 1.0),
        b: (c.b + amount).clamp(0.0, 1.0),
        a: c.a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lighten_clamps() {
        let c = lighten(Color::WHITE, 0.5);
        assert_eq!(c, Color::WHITE);
        let c = lighten(Color::BLACK, -0.5);
        assert_eq!(c, Color::BLACK);
    }

    #[test]
    fn test_hover_is_lighter_than_idle() {
        let idle = action_button(TOGGLE_BUTTON, button::Status::Active);
        let hovered = action_button(TOGGLE_BUTTON, button::Status::Hovered);
        let (Some(Background::Color(a)), Some(Background::Color(b))) =
            (idle.background, hovered.background)
        else {
            panic!("expected solid backgrounds");
        };
        assert!(b.r > a.r);
    }
}
