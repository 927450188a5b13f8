//! Stroke practice widget state.
//!
//! [`StrokeWriter`] is the per-character writer instance behind the narrow
//! interface {animate, loop, quiz}. One instance exists per displayed
//! character; the previous instance is dropped before the next is created.
//!
//! Animation is a pure function of elapsed time: each stroke takes a fixed
//! draw time followed by an inter-stroke delay. Quiz mode (描红) grades the
//! user's drawn polyline against the expected stroke median by arc-length
//! resampling and mean point distance, shows a hint after the first miss on
//! a stroke, and reports completion with the total mistake count.

use crate::config::StrokeConfig;
use crate::strokes::data::StrokeData;

// ---------------------------------------------------------------------------
// Modes and events
// ---------------------------------------------------------------------------

/// Current widget mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterMode {
    /// Animate the character once, then hold the finished glyph.
    Animate,
    /// Animate the character continuously.
    Loop,
    /// Self-quiz: the user draws each stroke in order.
    Quiz,
}

/// Outcome of grading one drawn stroke in quiz mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    /// The drawn stroke did not match stroke `stroke` (0-based).
    Mistake { stroke: usize },
    /// The stroke matched; `next` (0-based) is the stroke now expected.
    CorrectStroke { next: usize },
    /// All strokes drawn; the widget replays the full animation.
    Complete { total_mistakes: u32 },
}

#[derive(Debug, Default)]
struct QuizState {
    current: usize,
    misses_on_current: u32,
    total_mistakes: u32,
    show_hint: bool,
}

/// How much of the character is currently drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnStrokes {
    /// Number of fully drawn strokes.
    pub complete: usize,
    /// Fraction (0..1) of the stroke currently being drawn, if any.
    pub partial: Option<(usize, f32)>,
}

// ---------------------------------------------------------------------------
// StrokeWriter
// ---------------------------------------------------------------------------

/// Per-character stroke practice widget state.
pub struct StrokeWriter {
    data: StrokeData,
    mode: WriterMode,
    elapsed: f32,
    quiz: Option<QuizState>,
    stroke_secs: f32,
    delay_secs: f32,
    match_threshold: f32,
}

impl StrokeWriter {
    /// Create a writer for one character's stroke data.
    ///
    /// Starts in [`WriterMode::Animate`] at time zero — the character
    /// animates once as soon as it is shown.
    pub fn new(data: StrokeData, config: &StrokeConfig) -> Self {
        Self {
            data,
            mode: WriterMode::Animate,
            elapsed: 0.0,
            quiz: None,
            stroke_secs: config.stroke_secs,
            delay_secs: config.delay_secs,
            match_threshold: config.match_threshold,
        }
    }

    pub fn mode(&self) -> WriterMode {
        self.mode
    }

    pub fn stroke_count(&self) -> usize {
        self.data.stroke_count()
    }

    /// Normalized median polyline of stroke `index`.
    pub fn median(&self, index: usize) -> &[(f32, f32)] {
        &self.data.medians[index]
    }

    /// The stroke to highlight as a hint, when quiz mode owes the user one.
    pub fn hint_stroke(&self) -> Option<usize> {
        self.quiz
            .as_ref()
            .filter(|q| q.show_hint)
            .map(|q| q.current)
    }

    // -----------------------------------------------------------------------
    // Mode switches
    // -----------------------------------------------------------------------

    /// Restart the one-shot animation. Cancels any quiz in progress.
    pub fn animate(&mut self) {
        self.mode = WriterMode::Animate;
        self.elapsed = 0.0;
        self.quiz = None;
    }

    /// Restart the animation in looping mode. Cancels any quiz in progress.
    pub fn loop_animation(&mut self) {
        self.mode = WriterMode::Loop;
        self.elapsed = 0.0;
        self.quiz = None;
    }

    /// Enter quiz mode with a blank slate.
    pub fn begin_quiz(&mut self) {
        self.mode = WriterMode::Quiz;
        self.elapsed = 0.0;
        self.quiz = Some(QuizState::default());
    }

    // -----------------------------------------------------------------------
    // Animation clock
    // -----------------------------------------------------------------------

    /// Seconds for one full animation pass (including the trailing delay,
    /// which doubles as the inter-loop pause).
    fn cycle_secs(&self) -> f32 {
        self.stroke_count() as f32 * (self.stroke_secs + self.delay_secs)
    }

    /// Advance the animation clock by `dt` seconds.
    ///
    /// Clamps at the end of the cycle in `Animate`, wraps in `Loop`, and is
    /// inert in `Quiz` (progress there is driven by graded strokes).
    pub fn advance(&mut self, dt: f32) {
        match self.mode {
            WriterMode::Animate => {
                self.elapsed = (self.elapsed + dt).min(self.cycle_secs());
            }
            WriterMode::Loop => {
                self.elapsed = (self.elapsed + dt) % self.cycle_secs();
            }
            WriterMode::Quiz => {}
        }
    }

    /// Whether the widget needs continuous repaints.
    pub fn is_animating(&self) -> bool {
        match self.mode {
            WriterMode::Animate => self.elapsed < self.cycle_secs(),
            WriterMode::Loop => true,
            WriterMode::Quiz => false,
        }
    }

    /// How much of the character should be painted right now.
    pub fn drawn(&self) -> DrawnStrokes {
        if self.mode == WriterMode::Quiz {
            let complete = self.quiz.as_ref().map(|q| q.current).unwrap_or(0);
            return DrawnStrokes {
                complete,
                partial: None,
            };
        }

        let per_stroke = self.stroke_secs + self.delay_secs;
        let index = (self.elapsed / per_stroke) as usize;
        if index >= self.stroke_count() {
            return DrawnStrokes {
                complete: self.stroke_count(),
                partial: None,
            };
        }

        let within = self.elapsed - index as f32 * per_stroke;
        if within < self.stroke_secs {
            DrawnStrokes {
                complete: index,
                partial: Some((index, within / self.stroke_secs)),
            }
        } else {
            // Inside the inter-stroke delay.
            DrawnStrokes {
                complete: index + 1,
                partial: None,
            }
        }
    }

    // -----------------------------------------------------------------------
    // Quiz grading
    // -----------------------------------------------------------------------

    /// Grade one user-drawn polyline against the expected stroke.
    ///
    /// Returns `None` outside quiz mode or for degenerate attempts (fewer
    /// than two points). On completion the widget leaves quiz mode and
    /// replays the full animation.
    pub fn grade_stroke(&mut self, attempt: &[(f32, f32)]) -> Option<QuizEvent> {
        if self.mode != WriterMode::Quiz || attempt.len() < 2 {
            return None;
        }
        let quiz = self.quiz.as_mut()?;

        let expected = &self.data.medians[quiz.current];
        let distance = mean_distance(attempt, expected);

        if distance > self.match_threshold {
            quiz.total_mistakes += 1;
            quiz.misses_on_current += 1;
            // Hint after the first miss on a stroke.
            quiz.show_hint = quiz.misses_on_current >= 1;
            return Some(QuizEvent::Mistake {
                stroke: quiz.current,
            });
        }

        quiz.current += 1;
        quiz.misses_on_current = 0;
        quiz.show_hint = false;

        if quiz.current == self.data.stroke_count() {
            let total_mistakes = quiz.total_mistakes;
            self.animate();
            Some(QuizEvent::Complete { total_mistakes })
        } else {
            Some(QuizEvent::CorrectStroke {
                next: quiz.current,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Polyline geometry
// ---------------------------------------------------------------------------

const RESAMPLE_POINTS: usize = 32;

fn point_distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

fn polyline_length(points: &[(f32, f32)]) -> f32 {
    points.windows(2).map(|w| point_distance(w[0], w[1])).sum()
}

/// Resample a polyline to `n` evenly spaced points (arc-length parameterized).
fn resample(points: &[(f32, f32)], n: usize) -> Vec<(f32, f32)> {
    if points.len() < 2 {
        return vec![points.first().copied().unwrap_or((0.0, 0.0)); n];
    }

    let total = polyline_length(points);
    if total <= f32::EPSILON {
        return vec![points[0]; n];
    }

    let step = total / (n - 1) as f32;
    let mut out = Vec::with_capacity(n);
    out.push(points[0]);

    let mut segment = 0;
    let mut walked = 0.0;
    for i in 1..n - 1 {
        let target = step * i as f32;
        while segment < points.len() - 2
            && walked + point_distance(points[segment], points[segment + 1]) < target
        {
            walked += point_distance(points[segment], points[segment + 1]);
            segment += 1;
        }
        let seg_len = point_distance(points[segment], points[segment + 1]);
        let t = if seg_len <= f32::EPSILON {
            0.0
        } else {
            ((target - walked) / seg_len).clamp(0.0, 1.0)
        };
        let (ax, ay) = points[segment];
        let (bx, by) = points[segment + 1];
        out.push((ax + (bx - ax) * t, ay + (by - ay) * t));
    }

    out.push(*points.last().unwrap());
    out
}

/// Mean point-to-point distance between two polylines after resampling both
/// to the same parameterization.
fn mean_distance(a: &[(f32, f32)], b: &[(f32, f32)]) -> f32 {
    let ra = resample(a, RESAMPLE_POINTS);
    let rb = resample(b, RESAMPLE_POINTS);
    ra.iter()
        .zip(rb.iter())
        .map(|(&p, &q)| point_distance(p, q))
        .sum::<f32>()
        / RESAMPLE_POINTS as f32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
