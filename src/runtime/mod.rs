use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use serde_json::json;

use crate::logging::{event_with_fields, json_kv};
use crate::render::{AnsiRenderer, Canvas};
use crate::{LogLevel, Logger, Result, RuntimeMetrics, Size};

pub mod diagnostics;
pub mod driver;

/// Configuration knobs for the runtime loop.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Interval between synthetic tick events.
    pub tick_interval: Duration,
    /// Optional structured logger used by the runtime.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<RuntimeMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(33),
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_millis(0),
            metrics_target: "folio::runtime.metrics".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(RuntimeMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<RuntimeMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// High-level events delivered to plugins.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    Tick { elapsed: Duration },
    Key(KeyEvent),
    Mouse(MouseEvent),
    Paste(String),
    FocusGained,
    FocusLost,
    Resize(Size),
}

/// Control the propagation of an event across plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    Continue,
    Consumed,
}

/// Context passed to plugins so they can interact with the runtime safely.
pub struct RuntimeContext {
    viewport: Size,
    redraw_requested: bool,
    exit_requested: bool,
}

impl RuntimeContext {
    fn new(viewport: Size) -> Self {
        Self {
            viewport,
            redraw_requested: false,
            exit_requested: false,
        }
    }

    /// Request that the next frame is painted.
    pub fn request_render(&mut self) {
        self.redraw_requested = true;
    }

    /// Signal to the runtime that execution should terminate at the end of the frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }
}

/// Behaviour injection point for the runtime.
pub trait FolioPlugin: Send {
    fn name(&self) -> &str {
        "folio_plugin"
    }

    fn init(&mut self, _ctx: &mut RuntimeContext) -> Result<()> {
        Ok(())
    }

    fn on_event(&mut self, _ctx: &mut RuntimeContext, _event: &RuntimeEvent) -> Result<EventFlow> {
        Ok(EventFlow::Continue)
    }

    /// Draw into the frame. Plugins paint in registration order.
    fn paint(&mut self, _canvas: &mut Canvas) -> Result<()> {
        Ok(())
    }
}

pub struct FolioRuntime {
    viewport: Size,
    canvas: Canvas,
    renderer: AnsiRenderer,
    plugins: Vec<Box<dyn FolioPlugin>>,
    config: RuntimeConfig,
    should_exit: bool,
    redraw_requested: bool,
    start_instant: Option<Instant>,
    last_metrics_emit: Option<Instant>,
}

impl FolioRuntime {
    pub fn new(renderer: AnsiRenderer, initial_size: Size) -> Self {
        Self {
            viewport: initial_size,
            canvas: Canvas::new(initial_size),
            renderer,
            plugins: Vec::new(),
            config: RuntimeConfig::default(),
            should_exit: false,
            redraw_requested: true,
            start_instant: None,
            last_metrics_emit: None,
        }
    }

    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn register_plugin<P>(&mut self, plugin: P)
    where
        P: FolioPlugin + 'static,
    {
        self.plugins.push(Box::new(plugin));
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// The last composed frame.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Adopt a new terminal size. Plugins learn about it through
    /// [`RuntimeEvent::Resize`] or, before startup, through `init`.
    pub fn resize(&mut self, size: Size) {
        if size == self.viewport {
            return;
        }
        self.viewport = size;
        self.canvas.resize(size);
        self.renderer.invalidate();
        self.redraw_requested = true;
        self.log_runtime_event(
            LogLevel::Info,
            "resized",
            [
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
            ],
        );
    }

    pub fn run(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.bootstrap(stdout)?;
        let mut last_tick = Instant::now();

        while !self.should_exit {
            let timeout = self
                .config
                .tick_interval
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_millis(0));

            if event::poll(timeout)? {
                let crossterm_event = event::read()?;
                let runtime_event = self.map_event(crossterm_event);
                self.dispatch_event(runtime_event)?;
                self.render_if_needed(stdout)?;
                if self.should_exit {
                    break;
                }
            }

            if last_tick.elapsed() >= self.config.tick_interval {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                self.dispatch_event(RuntimeEvent::Tick { elapsed })?;
                self.render_if_needed(stdout)?;
            }

            self.maybe_emit_metrics();
        }

        self.finalize();
        Ok(())
    }

    /// Drive the loop from a fixed event list instead of the terminal.
    pub fn run_scripted<I>(&mut self, stdout: &mut impl Write, events: I) -> Result<()>
    where
        I: IntoIterator<Item = RuntimeEvent>,
    {
        self.bootstrap(stdout)?;
        for event in events {
            if let RuntimeEvent::Resize(size) = event {
                self.resize(size);
            }
            self.dispatch_event(event)?;
            self.render_if_needed(stdout)?;
            if self.should_exit {
                break;
            }
        }
        self.finalize();
        Ok(())
    }

    fn dispatch_event(&mut self, event: RuntimeEvent) -> Result<()> {
        let mut consumed = false;
        for idx in 0..self.plugins.len() {
            let mut ctx = RuntimeContext::new(self.viewport);
            let flow = self.plugins[idx].on_event(&mut ctx, &event)?;
            self.apply_context(ctx);
            if flow == EventFlow::Consumed {
                consumed = true;
                break;
            }
        }
        self.record_event_metric();
        if !matches!(event, RuntimeEvent::Tick { .. }) {
            self.log_runtime_event(
                LogLevel::Debug,
                "event_dispatched",
                [
                    json_kv("event", json!(Self::describe_event(&event))),
                    json_kv("consumed", json!(consumed)),
                ],
            );
        }
        self.maybe_emit_metrics();
        Ok(())
    }

    fn render_if_needed(&mut self, stdout: &mut impl Write) -> Result<()> {
        if !self.redraw_requested {
            return Ok(());
        }
        self.redraw_requested = false;

        self.canvas.clear();
        for plugin in self.plugins.iter_mut() {
            plugin.paint(&mut self.canvas)?;
        }

        let rows = self.renderer.render(stdout, &self.canvas)?;
        self.record_frame_metric(rows);
        if rows > 0 {
            self.log_runtime_event(
                LogLevel::Trace,
                "render_completed",
                [json_kv("rows_flushed", json!(rows))],
            );
        }
        Ok(())
    }

    fn apply_context(&mut self, ctx: RuntimeContext) {
        if ctx.redraw_requested {
            self.redraw_requested = true;
        }
        if ctx.exit_requested && !self.should_exit {
            self.should_exit = true;
            self.log_runtime_event(LogLevel::Info, "exit_requested", std::iter::empty());
        }
    }

    fn map_event(&mut self, event: CrosstermEvent) -> RuntimeEvent {
        match event {
            CrosstermEvent::Key(key) => RuntimeEvent::Key(key),
            CrosstermEvent::Mouse(mouse) => RuntimeEvent::Mouse(mouse),
            CrosstermEvent::Paste(data) => RuntimeEvent::Paste(data),
            CrosstermEvent::FocusGained => RuntimeEvent::FocusGained,
            CrosstermEvent::FocusLost => RuntimeEvent::FocusLost,
            CrosstermEvent::Resize(width, height) => {
                let size = Size::new(width, height);
                self.resize(size);
                RuntimeEvent::Resize(size)
            }
        }
    }

    fn bootstrap(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.should_exit = false;
        self.redraw_requested = true;
        self.ensure_metrics_initialized();
        let now = Instant::now();
        self.start_instant = Some(now);
        self.last_metrics_emit = Some(now);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_started",
            [
                json_kv("plugins", json!(self.plugins.len())),
                json_kv("width", json!(self.viewport.width)),
                json_kv("height", json!(self.viewport.height)),
            ],
        );

        for idx in 0..self.plugins.len() {
            let mut ctx = RuntimeContext::new(self.viewport);
            self.plugins[idx].init(&mut ctx)?;
            let plugin_name = self.plugins[idx].name().to_string();
            self.log_runtime_event(
                LogLevel::Debug,
                "plugin_initialized",
                [json_kv("plugin", json!(plugin_name))],
            );
            self.apply_context(ctx);
        }

        self.render_if_needed(stdout)
    }

    fn finalize(&mut self) {
        let uptime_ms = self
            .start_instant
            .map(|start| start.elapsed().as_millis())
            .unwrap_or(0);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_stopped",
            [json_kv("uptime_ms", json!(uptime_ms))],
        );
    }

    fn ensure_metrics_initialized(&mut self) {
        if self.config.metrics.is_none() && self.config.metrics_interval > Duration::from_millis(0)
        {
            self.config.enable_metrics();
        }
    }

    fn log_runtime_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            if !logger.enabled(level) {
                return;
            }
            let event = event_with_fields(level, "folio::runtime", message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn record_event_metric(&mut self) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_event();
            }
        }
    }

    fn record_frame_metric(&mut self, rows: usize) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_frame(rows);
            }
        }
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() {
            return;
        }

        if self.config.metrics_interval == Duration::from_millis(0) {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => {
                return;
            }
            _ => {
                self.last_metrics_emit = Some(now);
            }
        }

        let uptime = self
            .start_instant
            .map(|start| now.duration_since(start))
            .unwrap_or_default();

        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let target = self.config.metrics_target.as_str();
                let snapshot_event = guard.snapshot(uptime).to_log_event(target);
                let _ = logger.log_event(snapshot_event);
            }
        }
    }

    fn describe_event(event: &RuntimeEvent) -> &'static str {
        match event {
            RuntimeEvent::Tick { .. } => "tick",
            RuntimeEvent::Key(_) => "key",
            RuntimeEvent::Mouse(_) => "mouse",
            RuntimeEvent::Paste(_) => "paste",
            RuntimeEvent::FocusGained => "focus_gained",
            RuntimeEvent::FocusLost => "focus_lost",
            RuntimeEvent::Resize(_) => "resize",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use crate::render::{CellStyle, RendererSettings};
    use crossterm::event::{KeyCode, KeyModifiers};

    struct Echo {
        keys: usize,
        consume: bool,
    }

    impl FolioPlugin for Echo {
        fn on_event(&mut self, ctx: &mut RuntimeContext, event: &RuntimeEvent) -> Result<EventFlow> {
            if let RuntimeEvent::Key(key) = event {
                self.keys += 1;
                if key.code == KeyCode::Char('q') {
                    ctx.request_exit();
                }
                ctx.request_render();
                if self.consume {
                    return Ok(EventFlow::Consumed);
                }
            }
            Ok(EventFlow::Continue)
        }

        fn paint(&mut self, canvas: &mut Canvas) -> Result<()> {
            canvas.put_str(0, 0, &format!("keys={}", self.keys), CellStyle::default(), 20);
            Ok(())
        }
    }

    fn key(c: char) -> RuntimeEvent {
        RuntimeEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn runtime() -> FolioRuntime {
        FolioRuntime::new(AnsiRenderer::new(RendererSettings::default()), Size::new(20, 3))
    }

    #[test]
    fn scripted_run_paints_and_exits() {
        let mut runtime = runtime();
        runtime.register_plugin(Echo {
            keys: 0,
            consume: false,
        });
        let mut out = Vec::new();
        runtime
            .run_scripted(&mut out, vec![key('a'), key('q'), key('z')])
            .unwrap();
        assert!(runtime.canvas().row_text(0).starts_with("keys=2"));
        assert!(String::from_utf8_lossy(&out).contains("keys=0"));
    }

    #[test]
    fn consumed_events_stop_propagation() {
        let mut runtime = runtime();
        runtime.register_plugin(Echo {
            keys: 0,
            consume: true,
        });
        runtime.register_plugin(Echo {
            keys: 100,
            consume: false,
        });
        runtime.run_scripted(&mut Vec::new(), vec![key('a')]).unwrap();
        // The second plugin paints last and never saw the key.
        assert!(runtime.canvas().row_text(0).starts_with("keys=100"));
    }

    #[test]
    fn resize_reaches_canvas() {
        let mut runtime = runtime();
        runtime
            .run_scripted(&mut Vec::new(), vec![RuntimeEvent::Resize(Size::new(40, 10))])
            .unwrap();
        assert_eq!(runtime.viewport(), Size::new(40, 10));
        assert_eq!(runtime.canvas().size(), Size::new(40, 10));
    }

    #[test]
    fn lifecycle_and_metrics_are_logged() {
        let sink = MemorySink::new();
        let mut runtime = runtime();
        runtime.config_mut().logger = Some(Logger::new(sink.clone()));
        runtime.config_mut().enable_metrics();
        runtime.register_plugin(Echo {
            keys: 0,
            consume: false,
        });
        runtime.run_scripted(&mut Vec::new(), vec![key('a')]).unwrap();

        let messages = sink.messages();
        assert_eq!(messages.first().map(String::as_str), Some("runtime_started"));
        assert!(messages.iter().any(|m| m == "event_dispatched"));
        assert_eq!(messages.last().map(String::as_str), Some("runtime_stopped"));

        let handle = runtime.config_mut().metrics_handle().unwrap();
        let snapshot = handle.lock().unwrap().snapshot(Duration::from_secs(1));
        assert_eq!(snapshot.events, 1);
        assert_eq!(snapshot.frames, 2);
    }
}
