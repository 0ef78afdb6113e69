use iced::widget::{column, container, image as iced_image, row, slider, text, Column};
use iced::{event, keyboard, time, Element, Event, Length, Subscription, Task, Theme};
use image::{DynamicImage, RgbImage};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use super::GuiSurface;
use crate::controls::{save_preset, TrackbarId, PANEL_TITLE};
use crate::display::KeyCommand;
use crate::models::FrameReport;
use crate::playback::{PlaybackLoop, StepOutcome};
use crate::video::FrameSource;

pub type GuiPlayback = PlaybackLoop<Box<dyn FrameSource + Send>, GuiSurface>;

#[derive(Debug, Clone)]
pub struct GuiSettings {
    /// Interval between playback iterations
    pub tick: Duration,
    /// Write the final thresholds here on exit
    pub save_thresholds: Option<PathBuf>,
}

/// Open the tracker window and drive playback until the operator quits
pub fn run(playback: GuiPlayback, settings: GuiSettings) -> iced::Result {
    let slot = Mutex::new(Some(playback));
    iced::application(
        move || {
            let playback = slot.lock().ok().and_then(|mut p| p.take());
            TrackerApp::new(playback, settings.clone())
        },
        TrackerApp::update,
        TrackerApp::view,
    )
    .title(|_state: &TrackerApp| PANEL_TITLE.to_string())
    .theme(|_state: &TrackerApp| Theme::Dark)
    .subscription(TrackerApp::subscription)
    .run()
}

struct TrackerApp {
    playback: Option<GuiPlayback>,
    frame_handle: Option<iced_image::Handle>,
    status: String,
    settings: GuiSettings,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    ThresholdChanged(TrackbarId, f32),
    Key(KeyCommand),
}

impl TrackerApp {
    fn new(playback: Option<GuiPlayback>, settings: GuiSettings) -> (Self, Task<Message>) {
        let status = if playback.is_some() {
            "Press r to restart, q to quit".to_string()
        } else {
            "No video source".to_string()
        };
        (
            Self {
                playback,
                frame_handle: None,
                status,
                settings,
            },
            Task::none(),
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => self.advance(),
            Message::ThresholdChanged(id, value) => {
                if let Some(playback) = self.playback.as_mut() {
                    playback.controls_mut().set(id, value.round() as i32);
                }
                Task::none()
            }
            Message::Key(key) => {
                if let Some(playback) = self.playback.as_mut() {
                    playback.display_mut().push_key(key);
                }
                Task::none()
            }
        }
    }

    fn advance(&mut self) -> Task<Message> {
        let Some(playback) = self.playback.as_mut() else {
            return Task::none();
        };

        match playback.step() {
            Ok(StepOutcome::Processed(report)) => {
                if let Some(frame) = playback.display_mut().take_frame() {
                    self.frame_handle = Some(to_handle(frame));
                }
                self.status = describe(&report);
                Task::none()
            }
            Ok(StepOutcome::Quit) | Ok(StepOutcome::EndOfStream) => self.finish(),
            Err(e) => {
                tracing::error!("Playback failed: {:#}", e);
                self.finish()
            }
        }
    }

    fn finish(&mut self) -> Task<Message> {
        if let Some(mut playback) = self.playback.take() {
            let bounds = playback.controls().bounds();
            playback.close();
            println!("{}", bounds);

            if let Some(path) = &self.settings.save_thresholds {
                if let Err(e) = save_preset(path, &bounds) {
                    tracing::error!("{:#}", e);
                }
            }
        }
        iced::exit()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            time::every(self.settings.tick).map(|_| Message::Tick),
            event::listen_with(on_event),
        ])
    }

    fn view(&self) -> Element<'_, Message> {
        let mut sliders = Column::new().spacing(6);
        if let Some(playback) = &self.playback {
            for bar in playback.controls().trackbars() {
                let id = bar.id;
                sliders = sliders.push(
                    row![
                        text(format!("{}: {}", bar.label(), bar.value))
                            .width(Length::Fixed(110.0)),
                        slider(0.0..=bar.max() as f32, bar.value as f32, move |v| {
                            Message::ThresholdChanged(id, v)
                        })
                        .step(1.0)
                        .width(Length::Fixed(400.0)),
                    ]
                    .spacing(10)
                    .align_y(iced::Alignment::Center),
                );
            }
        }

        let frame: Element<'_, Message> = match &self.frame_handle {
            Some(handle) => iced_image::viewer(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => container(text("Waiting for frames").size(20))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        container(
            column![
                text(PANEL_TITLE).size(24),
                sliders,
                text(&self.status).size(14),
                frame,
            ]
            .spacing(12)
            .padding(16),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }
}

fn on_event(event: Event, _status: event::Status, _window: iced::window::Id) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => match key.as_ref() {
            keyboard::Key::Character(c) => c
                .chars()
                .next()
                .and_then(KeyCommand::from_key)
                .map(Message::Key),
            _ => None,
        },
        _ => None,
    }
}

fn describe(report: &FrameReport) -> String {
    match &report.detection {
        Some(d) => format!(
            "Frame {}: {} contours, ball at ({}, {}) r={:.0}",
            report.frame_number, report.contour_count, d.centroid.0, d.centroid.1, d.circle.radius
        ),
        None => format!(
            "Frame {}: {} contours, no detection",
            report.frame_number, report.contour_count
        ),
    }
}

fn to_handle(frame: RgbImage) -> iced_image::Handle {
    let width = frame.width();
    let height = frame.height();
    let rgba = DynamicImage::ImageRgb8(frame).to_rgba8();
    iced_image::Handle::from_rgba(width, height, rgba.into_raw())
}
