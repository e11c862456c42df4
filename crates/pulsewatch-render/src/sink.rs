//! The display surface the renderer writes to.

use std::time::Duration;

use crate::chart::{ChartFrame, RedrawMode};
use crate::error::RenderError;

/// Text targets on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Cpu,
    Memory,
    Load,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Cpu, Field::Memory, Field::Load];

    /// Stable identifier, used as the element id in HTML output.
    pub fn id(self) -> &'static str {
        match self {
            Field::Cpu => "cpu",
            Field::Memory => "memory",
            Field::Load => "load",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Field::Cpu => 0,
            Field::Memory => 1,
            Field::Load => 2,
        }
    }
}

/// A display surface.
///
/// The renderer calls the setters for one poll outcome and then
/// `present` once, so sinks that write whole frames can buffer until then.
pub trait DisplaySink {
    fn set_text(&mut self, field: Field, text: &str);

    fn set_status(&mut self, text: &str, class: &str);

    fn draw_chart(&mut self, frame: &ChartFrame, mode: RedrawMode);

    /// Flush everything set since the last call.
    fn present(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    /// The poll interval changed.
    fn interval_changed(&mut self, _interval: Duration) {}
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn set_text(&mut self, field: Field, text: &str) {
        (**self).set_text(field, text);
    }

    fn set_status(&mut self, text: &str, class: &str) {
        (**self).set_status(text, class);
    }

    fn draw_chart(&mut self, frame: &ChartFrame, mode: RedrawMode) {
        (**self).draw_chart(frame, mode);
    }

    fn present(&mut self) -> Result<(), RenderError> {
        (**self).present()
    }

    fn interval_changed(&mut self, interval: Duration) {
        (**self).interval_changed(interval);
    }
}

/// Fan out to several sinks. Presents all of them even if one fails and
/// returns the first error.
impl<S: DisplaySink> DisplaySink for Vec<S> {
    fn set_text(&mut self, field: Field, text: &str) {
        for sink in self.iter_mut() {
            sink.set_text(field, text);
        }
    }

    fn set_status(&mut self, text: &str, class: &str) {
        for sink in self.iter_mut() {
            sink.set_status(text, class);
        }
    }

    fn draw_chart(&mut self, frame: &ChartFrame, mode: RedrawMode) {
        for sink in self.iter_mut() {
            sink.draw_chart(frame, mode);
        }
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let mut first_err = None;
        for sink in self.iter_mut() {
            if let Err(e) = sink.present() {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn interval_changed(&mut self, interval: Duration) {
        for sink in self.iter_mut() {
            sink.interval_changed(interval);
        }
    }
}

/// Records everything written to it.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    fields: [Option<String>; 3],
    status: Option<(String, String)>,
    frames: Vec<(ChartFrame, RedrawMode)>,
    presents: usize,
    interval: Option<Duration>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.fields[field.index()].as_deref()
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn status_class(&self) -> Option<&str> {
        self.status.as_ref().map(|(_, class)| class.as_str())
    }

    /// Every chart draw, oldest first.
    pub fn frames(&self) -> &[(ChartFrame, RedrawMode)] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&ChartFrame> {
        self.frames.last().map(|(frame, _)| frame)
    }

    pub fn presents(&self) -> usize {
        self.presents
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }
}

impl DisplaySink for MemorySink {
    fn set_text(&mut self, field: Field, text: &str) {
        self.fields[field.index()] = Some(text.to_string());
    }

    fn set_status(&mut self, text: &str, class: &str) {
        self.status = Some((text.to_string(), class.to_string()));
    }

    fn draw_chart(&mut self, frame: &ChartFrame, mode: RedrawMode) {
        self.frames.push((frame.clone(), mode));
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.presents += 1;
        Ok(())
    }

    fn interval_changed(&mut self, interval: Duration) {
        self.interval = Some(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_fans_out() {
        let mut sinks = vec![MemorySink::new(), MemorySink::new()];
        sinks.set_text(Field::Load, "0.75");
        sinks.set_status("ok", "status safe");
        sinks.present().unwrap();

        for sink in &sinks {
            assert_eq!(sink.text(Field::Load), Some("0.75"));
            assert_eq!(sink.text(Field::Cpu), None);
            assert_eq!(sink.status_class(), Some("status safe"));
            assert_eq!(sink.presents(), 1);
        }
    }

    #[test]
    fn field_ids_are_stable() {
        let ids: Vec<&str> = Field::ALL.iter().map(|f| f.id()).collect();
        assert_eq!(ids, vec!["cpu", "memory", "load"]);
    }
}
