//! Top-level processing loop.

use std::io::BufRead;

use fomtrace_canvas::{DrawingSurface, SvgSurface};
use fomtrace_protocol::RecordAssembler;

use crate::{EngineError, EngineState, Renderer, TraceConfig, TraceSummary};

/// Drives lines through the assembler and completed records through the renderer.
pub struct TraceDriver<S> {
    assembler: RecordAssembler,
    renderer: Renderer,
    state: EngineState<S>,
}

impl<S: DrawingSurface> TraceDriver<S> {
    /// Validate `config`, set up a fresh pass and draw the image frame.
    pub fn new(config: &TraceConfig, surface: S) -> Result<Self, EngineError> {
        let renderer = Renderer::new(config);
        let mut state = EngineState::new(config, surface)?;
        renderer.draw_frame(&mut state);
        Ok(Self {
            assembler: RecordAssembler::default(),
            renderer,
            state,
        })
    }

    pub fn feed_line(&mut self, line: &str) -> Result<(), EngineError> {
        if let Some(record) = self.assembler.push(line)? {
            self.renderer.render(&record, &mut self.state)?;
        }
        Ok(())
    }

    /// Feed every line of `input`. Does not close the last record; see
    /// [`TraceDriver::finish`].
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<(), EngineError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let line = self.assembler.lines_seen() + 1;
            let read = input
                .read_until(b'\n', &mut buf)
                .map_err(|source| EngineError::Input { line, source })?;
            if read == 0 {
                return Ok(());
            }
            let text = std::str::from_utf8(&buf).map_err(|source| EngineError::Encoding { line, source })?;
            self.feed_line(text)?;
        }
    }

    pub fn state(&self) -> &EngineState<S> {
        &self.state
    }

    pub fn summary(&self) -> TraceSummary {
        TraceSummary {
            lines: self.assembler.lines_seen(),
            filtered_headers: self.assembler.filtered(),
            ..self.state.summary()
        }
    }

    /// Close the last open record, save the image and return the surface
    /// with the run's totals.
    pub fn finish(mut self) -> Result<(S, TraceSummary), EngineError> {
        if let Some(record) = self.assembler.finish() {
            self.renderer.render(&record, &mut self.state)?;
        }
        let summary = self.summary();
        tracing::info!(
            lines = summary.lines,
            tasks = summary.tasks_created,
            live = summary.tasks_live,
            io = summary.io_completed,
            "Trace processed"
        );
        let surface = self.state.canvas.finish()?;
        Ok((surface, summary))
    }
}

/// Render `input` to the SVG file named by `config.output`.
pub fn render_trace<R: BufRead>(config: &TraceConfig, input: R) -> Result<TraceSummary, EngineError> {
    let surface = SvgSurface::new(&config.output, f64::from(config.width), f64::from(config.height));
    let mut driver = TraceDriver::new(config, surface)?;
    driver.run(input)?;
    let (_, summary) = driver.finish()?;
    Ok(summary)
}
