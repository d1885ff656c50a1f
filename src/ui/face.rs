//! Word clock watchface
//!
//! Time in words on top, connection and battery status at the bottom.

use crate::clock::TimeOfDay;
use crate::config::FaceConfig;
use crate::event::{ColorPair, Directive, Directives, Event, TextField};
use crate::status::StatusMonitor;

use super::locale::{English, Locale};
use super::words::{self, PhraseMode, WordPhrase};
use super::WatchFace;

pub struct WordClockFace<L = English> {
    mode: PhraseMode,
    locale: L,
    monitor: StatusMonitor,
}

impl WordClockFace<English> {
    /// Create the watchface with the connection state queried at boot
    pub fn new(config: FaceConfig, connected: bool) -> Self {
        Self::with_locale(config, connected, English)
    }
}

impl<L: Locale> WordClockFace<L> {
    pub fn with_locale(config: FaceConfig, connected: bool, locale: L) -> Self {
        Self {
            mode: config.phrase_mode,
            locale,
            monitor: StatusMonitor::new(config.monitor, connected),
        }
    }

    pub fn monitor(&self) -> &StatusMonitor {
        &self.monitor
    }

    fn show_time(&self, time: TimeOfDay, directives: &mut Directives) {
        let phrase: WordPhrase = words::format(time, self.mode, &self.locale);
        trace!("time {}:{}", time.hour(), time.minute());

        match phrase {
            WordPhrase::Consolidated(text) => directives.push(Directive::SetText {
                field: TextField::Phrase,
                text,
            }),
            WordPhrase::Split3 {
                lead,
                connector,
                minute,
            } => {
                directives.push(Directive::SetText {
                    field: TextField::Lead,
                    text: lead,
                });
                directives.push(Directive::SetText {
                    field: TextField::Connector,
                    text: connector,
                });
                directives.push(Directive::SetText {
                    field: TextField::Minute,
                    text: minute,
                });
            }
        }
    }

    fn time_fields(&self) -> &'static [TextField] {
        match self.mode {
            PhraseMode::Consolidated => &[TextField::Phrase],
            PhraseMode::Split3 => &[TextField::Lead, TextField::Connector, TextField::Minute],
        }
    }
}

impl<L: Locale> WatchFace for WordClockFace<L> {
    fn start(&mut self, time: TimeOfDay) -> Directives {
        let mut directives = Directives::new();
        for &field in self.time_fields() {
            directives.push(Directive::SetColors {
                field,
                colors: ColorPair::NORMAL,
            });
        }
        self.show_time(time, &mut directives);
        directives.extend(self.monitor.start());
        directives
    }

    fn handle(&mut self, event: Event) -> Directives {
        let mut directives = Directives::new();
        if let Event::TickMinute { time, .. } = event {
            self.show_time(time, &mut directives);
        }
        directives.extend(self.monitor.handle(&event));
        directives
    }
}
