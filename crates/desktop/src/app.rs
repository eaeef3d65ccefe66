use std::time::Duration;

use iced::widget::{button, column, container, image, mouse_area, row, stack, text};
use iced::{mouse, window, ContentFit, Element, Font, Length, Subscription, Task, Theme};

use eyesee_core::pipeline::live_session::{LiveSession, TickOutcome};
use eyesee_core::shared::frame::Frame;

use crate::assets::{Assets, LOGO_SIZE};
use crate::theme;

const WEBSITE_URL: &str = "https://yaseensportfolio.vercel.app/";

pub const PIXEL_FONT: Font = Font::with_name("Pixelify Sans");

const VIDEO_WIDTH: f32 = 640.0;
const VIDEO_HEIGHT: f32 = 480.0;

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
    ToggleDetection,
    SaveSnapshot,
    OpenWebsite,
    CloseRequested(window::Id),
}

pub struct App {
    session: LiveSession,
    assets: Assets,
    tick_interval: Duration,
    frame: Option<image::Handle>,
}

impl App {
    pub fn new(session: LiveSession, assets: Assets, tick_interval: Duration) -> Self {
        Self {
            session,
            assets,
            tick_interval,
            frame: None,
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                if let TickOutcome::Frame(live) = self.session.tick() {
                    self.frame = Some(frame_handle(&live.frame));
                }
            }
            Message::ToggleDetection => {
                self.session.toggle_detection();
            }
            Message::SaveSnapshot => {
                if let Err(e) = self.session.save_snapshot() {
                    log::error!("Snapshot failed: {e}");
                }
            }
            Message::OpenWebsite => {
                if let Err(e) = open::that(WEBSITE_URL) {
                    log::warn!("Could not open {WEBSITE_URL}: {e}");
                }
            }
            Message::CloseRequested(_) => {
                self.session.shutdown();
                return iced::exit();
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let logo: Element<'_, Message> = match &self.assets.logo {
            Some(handle) => image(handle.clone()).into(),
            None => blank(LOGO_SIZE as f32, LOGO_SIZE as f32),
        };
        let logo = mouse_area(container(logo).padding(5))
            .on_press(Message::OpenWebsite)
            .interaction(mouse::Interaction::Pointer);

        let title = container(
            row![logo, text("Eye See").size(36).font(self.font())]
                .spacing(10)
                .align_y(iced::Alignment::Center),
        )
        .padding([5, 10])
        .style(theme::title_bar);

        let video: Element<'_, Message> = match &self.frame {
            Some(handle) => image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => blank(Length::Fill, Length::Fill),
        };
        let video = container(video)
            .width(VIDEO_WIDTH)
            .height(VIDEO_HEIGHT)
            .style(theme::video_frame);

        let face_count = text(face_count_label(self.session.face_count()))
            .size(24)
            .font(self.font());

        let buttons = row![
            button(text("Toggle Detection").font(self.font()))
                .padding(10)
                .style(theme::toggle_button)
                .on_press(Message::ToggleDetection),
            button(text("Save Snapshot").font(self.font()))
                .padding(10)
                .style(theme::snapshot_button)
                .on_press(Message::SaveSnapshot),
        ]
        .spacing(20);

        let content = container(
            column![title, video, face_count, buttons]
                .spacing(15)
                .align_x(iced::Alignment::Center),
        )
        .center(Length::Fill);

        match &self.assets.background {
            Some(bg) => stack![
                image(bg.clone())
                    .content_fit(ContentFit::Cover)
                    .width(Length::Fill)
                    .height(Length::Fill),
                content,
            ]
            .into(),
            None => container(content)
                .style(theme::solid_background)
                .into(),
        }
    }

    pub fn theme(&self) -> Theme {
        theme::eye_see_theme()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            iced::time::every(self.tick_interval).map(|_| Message::Tick),
            window::close_requests().map(Message::CloseRequested),
        ])
    }

    fn font(&self) -> Font {
        if self.assets.font.is_some() {
            PIXEL_FONT
        } else {
            Font::DEFAULT
        }
    }
}

fn blank<'a>(width: impl Into<Length>, height: impl Into<Length>) -> Element<'a, Message> {
    container(column![]).width(width).height(height).into()
}

fn face_count_label(count: usize) -> String {
    format!("Faces Detected: {count}")
}

/// Converts a packed RGB frame into an RGBA image handle.
fn frame_handle(frame: &Frame) -> image::Handle {
    image::Handle::from_rgba(frame.width(), frame.height(), rgb_to_rgba(frame.data()))
}

fn rgb_to_rgba(rgb: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
    for px in rgb.chunks_exact(3) {
        rgba.extend_from_slice(px);
        rgba.push(255);
    }
    rgba
}
