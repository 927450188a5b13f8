//! 墨韵 · 字源 — egui/eframe application.
//!
//! # Architecture
//!
//! [`HanziApp`] is the top-level [`eframe::App`] that owns the UI state and
//! two channel endpoints:
//!
//! * `command_tx` — sends [`QueryCommand`] to the session orchestrator.
//! * `result_rx`  — receives [`QueryResult`] from the orchestrator.
//!
//! The app polls both non-blocking each frame and renders according to the
//! [`QueryStatus`] state machine. The playback coordinator is shared directly
//! (read-only from the UI's perspective): the per-sentence loading affordance
//! and the disabling of other read-aloud buttons are driven purely by its
//! active marker.
//!
//! # Views
//!
//! | Status | Visual |
//! |--------|--------|
//! | `Idle` | Input field + suggested characters |
//! | `Loading` | Spinner + "研墨中..." |
//! | `Success` | Full record: pinyin, meanings, examples, etymology, timeline, facts |
//! | `Error` | Fixed failure message |

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::playback::PlaybackCoordinator;
use crate::query::{QueryCommand, QueryResult, QueryState, QueryStatus};
use crate::record::CharacterRecord;
use crate::strokes::{QuizEvent, StrokeWriter, WriterMode};

// ---------------------------------------------------------------------------
// Ink palette
// ---------------------------------------------------------------------------

const INK: egui::Color32 = egui::Color32::from_rgb(45, 45, 45);
const INK_LIGHT: egui::Color32 = egui::Color32::from_rgb(120, 120, 120);
const INK_FAINT: egui::Color32 = egui::Color32::from_rgb(190, 186, 178);
const PAPER: egui::Color32 = egui::Color32::from_rgb(247, 244, 238);
const SEAL: egui::Color32 = egui::Color32::from_rgb(185, 28, 28);

// ---------------------------------------------------------------------------
// View mode
// ---------------------------------------------------------------------------

/// Which face of the character card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewMode {
    /// The large calligraphic glyph.
    Calligraphy,
    /// The stroke-order practice widget.
    Strokes,
}

// ---------------------------------------------------------------------------
// HanziApp
// ---------------------------------------------------------------------------

/// eframe application — the character etymology explorer.
pub struct HanziApp {
    // ── Query state ──────────────────────────────────────────────────────
    /// Input text, status and the current record / error.
    pub query: QueryState,

    // ── Stroke widget ────────────────────────────────────────────────────
    /// Calligraphy vs. stroke-order face of the character card.
    view_mode: ViewMode,
    /// Per-character writer; replaced (never reused) on character change.
    stroke_writer: Option<StrokeWriter>,
    /// A stroke-data fetch is in flight.
    strokes_loading: bool,
    /// The dataset has no entry for the current character.
    strokes_missing: bool,
    /// Feedback line under the practice grid (quiz progress, mistakes).
    quiz_message: String,
    /// Points of the stroke the user is currently drawing, in unit
    /// coordinates of the practice grid.
    current_attempt: Vec<(f32, f32)>,

    // ── UI state ─────────────────────────────────────────────────────────
    /// Spinner animation phase (increases each frame).
    spinner_phase: f32,

    // ── Channels ─────────────────────────────────────────────────────────
    /// Send commands to the background session orchestrator.
    pub command_tx: mpsc::Sender<QueryCommand>,
    /// Receive results from the background session orchestrator.
    pub result_rx: mpsc::Receiver<QueryResult>,

    // ── Shared services ──────────────────────────────────────────────────
    /// Playback coordinator; read for the per-sentence active affordance.
    playback: Arc<PlaybackCoordinator>,

    // ── Configuration ────────────────────────────────────────────────────
    /// Application configuration (read-only after startup).
    pub config: AppConfig,
}

impl HanziApp {
    /// Create a new [`HanziApp`].
    pub fn new(
        command_tx: mpsc::Sender<QueryCommand>,
        result_rx: mpsc::Receiver<QueryResult>,
        playback: Arc<PlaybackCoordinator>,
        config: AppConfig,
    ) -> Self {
        Self {
            query: QueryState::new(),
            view_mode: ViewMode::Calligraphy,
            stroke_writer: None,
            strokes_loading: false,
            strokes_missing: false,
            quiz_message: String::new(),
            current_attempt: Vec::new(),
            spinner_phase: 0.0,
            command_tx,
            result_rx,
            playback,
            config,
        }
    }

    // ── Fonts ────────────────────────────────────────────────────────────

    /// Install a system CJK font so hanzi render.
    ///
    /// Checked in order; the first readable file wins. egui's bundled fonts
    /// carry no CJK glyphs, so without this every character shows as a
    /// placeholder box.
    pub fn install_cjk_fonts(ctx: &egui::Context) {
        const CANDIDATES: &[&str] = &[
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
            "/System/Library/Fonts/PingFang.ttc",
            "C:\\Windows\\Fonts\\msyh.ttc",
        ];

        for path in CANDIDATES {
            match std::fs::read(path) {
                Ok(bytes) => {
                    let mut fonts = egui::FontDefinitions::default();
                    fonts
                        .font_data
                        .insert("cjk".to_owned(), egui::FontData::from_owned(bytes).into());
                    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
                        fonts
                            .families
                            .entry(family)
                            .or_default()
                            .insert(0, "cjk".to_owned());
                    }
                    ctx.set_fonts(fonts);
                    log::info!("CJK font loaded: {path}");
                    return;
                }
                Err(_) => continue,
            }
        }
        log::warn!("no CJK font found; hanzi will render as placeholder boxes");
    }

    // ── Channel polling ──────────────────────────────────────────────────

    /// Drain all pending orchestrator results (non-blocking).
    fn poll_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                QueryResult::AnalysisComplete { token, record } => {
                    if self.query.complete(token, record) {
                        self.reset_stroke_panel();
                    }
                }
                QueryResult::AnalysisFailed { token } => {
                    if self.query.fail(token) {
                        self.reset_stroke_panel();
                    }
                }
                QueryResult::StrokesLoaded { character, data } => {
                    self.strokes_loading = false;
                    // Only accept data for the character still on screen; a
                    // slow fetch for a previous character is dropped.
                    if self.current_character() == Some(character) {
                        self.stroke_writer =
                            Some(StrokeWriter::new(data, &self.config.strokes));
                    }
                }
                QueryResult::StrokesFailed { character } => {
                    self.strokes_loading = false;
                    if self.current_character() == Some(character) {
                        self.strokes_missing = true;
                    }
                }
            }
        }
    }

    /// First character of the displayed record, if any.
    fn current_character(&self) -> Option<char> {
        self.query
            .record
            .as_ref()
            .and_then(|r| r.character.chars().next())
    }

    /// Dispose the per-character stroke widget state. Called whenever a new
    /// analysis lands so the next character starts from a fresh instance.
    fn reset_stroke_panel(&mut self) {
        self.view_mode = ViewMode::Calligraphy;
        self.stroke_writer = None;
        self.strokes_loading = false;
        self.strokes_missing = false;
        self.quiz_message.clear();
        self.current_attempt.clear();
    }

    // ── Actions ──────────────────────────────────────────────────────────

    /// Run the submit guard and dispatch the analysis command.
    fn submit(&mut self) {
        let raw = self.query.input.clone();
        if let Some(sub) = self.query.submit(&raw) {
            let _ = self.command_tx.try_send(QueryCommand::Analyze {
                token: sub.token,
                character: sub.character,
            });
        }
    }

    fn read_aloud(&self, sentence: &str) {
        let _ = self.command_tx.try_send(QueryCommand::ReadAloud {
            text: sentence.to_string(),
        });
    }

    fn request_strokes(&mut self, character: char) {
        if !self.strokes_loading {
            self.strokes_loading = true;
            let _ = self
                .command_tx
                .try_send(QueryCommand::FetchStrokes { character });
        }
    }

    // ── Header / input ───────────────────────────────────────────────────

    fn draw_header(&mut self, ui: &mut egui::Ui) {
        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("墨韵 · 字源").color(INK).size(34.0));
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new("探寻汉字之美，追溯千年墨迹")
                    .color(INK_LIGHT)
                    .size(13.0),
            );
        });
        ui.add_space(16.0);
    }

    fn draw_input(&mut self, ui: &mut egui::Ui) {
        let busy = self.query.status.is_busy();

        ui.vertical_centered(|ui| {
            ui.horizontal(|ui| {
                let total = ui.available_width();
                ui.add_space((total - 320.0).max(0.0) / 2.0);

                let edit = egui::TextEdit::singleline(&mut self.query.input)
                    .hint_text("输入一个汉字...")
                    .char_limit(1)
                    .font(egui::TextStyle::Heading)
                    .desired_width(260.0);
                let response = ui.add(edit);

                let can_submit = !busy && !self.query.input.trim().is_empty();
                let clicked = ui
                    .add_enabled(can_submit, egui::Button::new(egui::RichText::new("解析")))
                    .clicked();
                let entered =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if can_submit && (clicked || entered) {
                    self.submit();
                }
            });
        });

        // Suggestions, only on the initial empty screen.
        if self.query.status == QueryStatus::Idle && self.query.record.is_none() {
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                ui.horizontal(|ui| {
                    let total = ui.available_width();
                    ui.add_space((total - 220.0).max(0.0) / 2.0);
                    ui.label(egui::RichText::new("推荐:").color(INK_LIGHT).size(13.0));
                    let suggestions = self.config.ui.suggestions.clone();
                    for ch in &suggestions {
                        if ui
                            .add(egui::Button::new(
                                egui::RichText::new(ch).color(INK).size(15.0),
                            ))
                            .clicked()
                        {
                            self.query.input = ch.clone();
                            self.submit();
                        }
                    }
                });
            });
        }
    }

    // ── Status panels ────────────────────────────────────────────────────

    fn draw_loading(&self, ui: &mut egui::Ui) {
        ui.add_space(60.0);
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(format!("{} 研墨中...", self.spinner_char()))
                    .color(INK_LIGHT)
                    .size(18.0),
            );
        });
    }

    fn draw_error(&self, ui: &mut egui::Ui) {
        let msg = self
            .query
            .error_message
            .clone()
            .unwrap_or_else(|| crate::query::ANALYSIS_FAILED_MESSAGE.to_string());

        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_rgb(252, 238, 238))
                .corner_radius(egui::CornerRadius::same(4))
                .inner_margin(egui::Margin::same(16))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(msg).color(SEAL).size(15.0));
                });
        });
    }

    // ── Record view ──────────────────────────────────────────────────────

    fn draw_record(&mut self, ui: &mut egui::Ui, record: &CharacterRecord) {
        self.draw_character_card(ui, record);
        ui.add_space(14.0);
        self.draw_meanings(ui, record);
        ui.add_space(14.0);
        self.draw_etymology(ui, record);
        ui.add_space(14.0);
        self.draw_timeline(ui, record);
        ui.add_space(14.0);
        self.draw_rare_facts(ui, record);
        ui.add_space(24.0);
    }

    /// The character card: view toggle, pinyin tags, glyph or stroke widget,
    /// formation/structure tags.
    fn draw_character_card(&mut self, ui: &mut egui::Ui, record: &CharacterRecord) {
        egui::Frame::new()
            .fill(egui::Color32::WHITE.gamma_multiply(0.6))
            .stroke(egui::Stroke::new(1.0, INK_FAINT))
            .corner_radius(egui::CornerRadius::same(3))
            .inner_margin(egui::Margin::same(14))
            .show(ui, |ui| {
                // View toggle
                ui.horizontal(|ui| {
                    for (mode, label) in [
                        (ViewMode::Calligraphy, "书法"),
                        (ViewMode::Strokes, "笔顺"),
                    ] {
                        let selected = self.view_mode == mode;
                        if ui.selectable_label(selected, label).clicked() {
                            self.view_mode = mode;
                        }
                    }
                });

                // Pinyin tags
                ui.add_space(6.0);
                ui.horizontal_wrapped(|ui| {
                    for py in &record.pinyin {
                        ui.label(egui::RichText::new(py).color(INK).size(19.0).italics());
                        ui.add_space(8.0);
                    }
                });

                ui.add_space(8.0);
                ui.vertical_centered(|ui| match self.view_mode {
                    ViewMode::Calligraphy => {
                        ui.label(
                            egui::RichText::new(&record.character)
                                .color(INK)
                                .size(150.0),
                        );
                    }
                    ViewMode::Strokes => {
                        self.draw_stroke_panel(ui);
                    }
                });

                // Metadata tags
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    for tag in [&record.kind, &record.structure] {
                        egui::Frame::new()
                            .stroke(egui::Stroke::new(1.0, INK_FAINT))
                            .corner_radius(egui::CornerRadius::same(10))
                            .inner_margin(egui::Margin::symmetric(10, 3))
                            .show(ui, |ui| {
                                ui.label(
                                    egui::RichText::new(tag).color(INK_LIGHT).size(13.0),
                                );
                            });
                        ui.add_space(6.0);
                    }
                });
            });
    }

    fn draw_meanings(&mut self, ui: &mut egui::Ui, record: &CharacterRecord) {
        Self::section_heading(ui, "基本含义");
        ui.label(egui::RichText::new(&record.basic_meaning).color(INK).size(14.0));

        ui.add_space(12.0);
        Self::section_heading(ui, "英文单词");
        ui.label(
            egui::RichText::new(&record.english_meaning)
                .color(INK)
                .size(14.0)
                .italics(),
        );

        ui.add_space(8.0);
        ui.label(
            egui::RichText::new("EXAMPLE SENTENCES")
                .color(INK_LIGHT)
                .size(11.0),
        );
        ui.add_space(4.0);

        let active = self.playback.active_text();
        for example in &record.english_examples {
            ui.horizontal(|ui| {
                let is_this = active.as_deref() == Some(example.sentence.as_str());
                if is_this {
                    ui.label(
                        egui::RichText::new(self.spinner_char().to_string())
                            .color(SEAL)
                            .size(13.0),
                    );
                } else if ui
                    .add_enabled(
                        active.is_none(),
                        egui::Button::new(egui::RichText::new("🔊").color(SEAL).size(13.0))
                            .frame(false),
                    )
                    .clicked()
                {
                    self.read_aloud(&example.sentence);
                }
                ui.label(egui::RichText::new(&example.sentence).color(INK).size(13.0));
            });
            ui.indent("translation", |ui| {
                ui.label(
                    egui::RichText::new(&example.translation)
                        .color(INK_LIGHT)
                        .size(12.0),
                );
            });
            ui.add_space(4.0);
        }

        ui.add_space(12.0);
        Self::section_heading(ui, "书写要点");
        ui.label(
            egui::RichText::new(&record.stroke_features)
                .color(INK)
                .size(14.0)
                .italics(),
        );
    }

    fn draw_etymology(&self, ui: &mut egui::Ui, record: &CharacterRecord) {
        Self::section_heading(ui, "字源探微");
        egui::Frame::new()
            .fill(PAPER)
            .stroke(egui::Stroke::new(1.0, INK_FAINT))
            .corner_radius(egui::CornerRadius::same(3))
            .inner_margin(egui::Margin::same(14))
            .show(ui, |ui| {
                ui.label(egui::RichText::new(&record.etymology).color(INK).size(15.0));
            });
    }

    /// Evolution timeline: one row per script stage, chronological.
    fn draw_timeline(&self, ui: &mut egui::Ui, record: &CharacterRecord) {
        Self::section_heading(ui, "演变历程");
        for (index, stage) in record.evolution.iter().enumerate() {
            ui.horizontal(|ui| {
                egui::Frame::new()
                    .fill(INK)
                    .corner_radius(egui::CornerRadius::same(2))
                    .inner_margin(egui::Margin::symmetric(8, 4))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(&stage.stage)
                                .color(PAPER)
                                .size(13.0),
                        );
                    });
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new(&stage.description)
                        .color(INK)
                        .size(13.0),
                );
            });
            if index + 1 < record.evolution.len() {
                ui.add_space(2.0);
                ui.label(egui::RichText::new("│").color(INK_FAINT).size(11.0));
                ui.add_space(2.0);
            }
        }
    }

    fn draw_rare_facts(&self, ui: &mut egui::Ui, record: &CharacterRecord) {
        egui::Frame::new()
            .fill(INK)
            .corner_radius(egui::CornerRadius::same(3))
            .inner_margin(egui::Margin::same(14))
            .show(ui, |ui| {
                ui.label(egui::RichText::new("拾遗 · 冷知").color(SEAL).size(17.0));
                ui.add_space(6.0);
                for (index, fact) in record.rare_features.iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(format!("{:02}", index + 1))
                                .color(SEAL)
                                .size(12.0)
                                .strong(),
                        );
                        ui.add_space(6.0);
                        ui.label(
                            egui::RichText::new(fact)
                                .color(egui::Color32::from_rgb(210, 207, 200))
                                .size(13.0),
                        );
                    });
                    ui.add_space(4.0);
                }
            });
    }

    fn section_heading(ui: &mut egui::Ui, title: &str) {
        ui.horizontal(|ui| {
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(4.0, 18.0), egui::Sense::hover());
            ui.painter()
                .rect_filled(rect, egui::CornerRadius::same(2), SEAL);
            ui.label(egui::RichText::new(title).color(INK).size(16.0).strong());
        });
        ui.add_space(4.0);
    }

    // ── Stroke practice panel ────────────────────────────────────────────

    const GRID_SIZE: f32 = 240.0;

    fn draw_stroke_panel(&mut self, ui: &mut egui::Ui) {
        let Some(character) = self.current_character() else {
            return;
        };

        if self.strokes_missing {
            ui.add_space(40.0);
            ui.label(
                egui::RichText::new("暂无该字笔顺数据")
                    .color(INK_LIGHT)
                    .size(14.0),
            );
            ui.add_space(40.0);
            return;
        }

        if self.stroke_writer.is_none() {
            self.request_strokes(character);
            ui.add_space(40.0);
            ui.label(
                egui::RichText::new(format!("{} 加载笔顺...", self.spinner_char()))
                    .color(INK_LIGHT)
                    .size(14.0),
            );
            ui.add_space(40.0);
            return;
        }

        self.draw_practice_grid(ui);
        ui.add_space(6.0);

        // Feedback line (quiz progress / mistakes).
        ui.label(
            egui::RichText::new(self.quiz_message.as_str())
                .color(SEAL)
                .size(13.0)
                .strong(),
        );
        ui.add_space(4.0);

        // Mode controls
        ui.horizontal(|ui| {
            let total = ui.available_width();
            ui.add_space((total - 190.0).max(0.0) / 2.0);

            if ui.button("演示").clicked() {
                if let Some(writer) = self.stroke_writer.as_mut() {
                    writer.animate();
                }
                self.quiz_message.clear();
                self.current_attempt.clear();
            }
            if ui.button("循环").clicked() {
                if let Some(writer) = self.stroke_writer.as_mut() {
                    writer.loop_animation();
                }
                self.quiz_message.clear();
                self.current_attempt.clear();
            }
            if ui
                .button(egui::RichText::new("描红").color(SEAL))
                .clicked()
            {
                if let Some(writer) = self.stroke_writer.as_mut() {
                    writer.begin_quiz();
                }
                self.quiz_message = "请在方格内书写...".into();
                self.current_attempt.clear();
            }
        });
    }

    /// The 米字格 practice grid with the animated / quizzed strokes.
    fn draw_practice_grid(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(Self::GRID_SIZE, Self::GRID_SIZE),
            egui::Sense::drag(),
        );
        let painter = ui.painter_at(rect);

        // Paper background + red grid
        painter.rect_filled(rect, egui::CornerRadius::same(2), PAPER);
        let grid = egui::Stroke::new(1.0, SEAL.gamma_multiply(0.25));
        painter.rect_stroke(rect, egui::CornerRadius::ZERO, grid, egui::StrokeKind::Inside);
        for (a, b) in [
            (rect.left_top(), rect.right_bottom()),
            (rect.right_top(), rect.left_bottom()),
            (rect.center_top(), rect.center_bottom()),
            (rect.left_center(), rect.right_center()),
        ] {
            painter.extend(egui::Shape::dashed_line(&[a, b], grid, 5.0, 5.0));
        }

        let to_screen =
            |&(x, y): &(f32, f32)| rect.min + egui::vec2(x, y) * Self::GRID_SIZE;

        let Some(writer) = self.stroke_writer.as_mut() else {
            return;
        };

        // Finished and in-progress strokes
        let drawn = writer.drawn();
        let ink_stroke = egui::Stroke::new(7.0, INK);
        for index in 0..drawn.complete {
            let points: Vec<egui::Pos2> = writer.median(index).iter().map(to_screen).collect();
            painter.add(egui::Shape::line(points, ink_stroke));
        }
        if let Some((index, fraction)) = drawn.partial {
            let median = writer.median(index);
            let count = ((median.len() as f32 * fraction).ceil() as usize).max(2);
            let points: Vec<egui::Pos2> =
                median.iter().take(count).map(to_screen).collect();
            painter.add(egui::Shape::line(points, ink_stroke));
        }

        // Quiz hint: highlight the expected stroke after a miss
        if let Some(hint) = writer.hint_stroke() {
            let points: Vec<egui::Pos2> = writer.median(hint).iter().map(to_screen).collect();
            painter.add(egui::Shape::line(
                points,
                egui::Stroke::new(5.0, SEAL.gamma_multiply(0.5)),
            ));
        }

        // Quiz input: capture the drag, grade on release
        if writer.mode() == WriterMode::Quiz {
            if response.dragged() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let unit = (pos - rect.min) / Self::GRID_SIZE;
                    self.current_attempt.push((unit.x, unit.y));
                }
            }

            if !self.current_attempt.is_empty() {
                let points: Vec<egui::Pos2> =
                    self.current_attempt.iter().map(to_screen).collect();
                painter.add(egui::Shape::line(points, egui::Stroke::new(6.0, INK_LIGHT)));
            }

            if response.drag_stopped() {
                let attempt = std::mem::take(&mut self.current_attempt);
                if let Some(event) = writer.grade_stroke(&attempt) {
                    self.quiz_message = match event {
                        QuizEvent::Mistake { stroke } => {
                            format!("笔顺错误，请注意提示 (第 {} 笔)", stroke + 1)
                        }
                        QuizEvent::CorrectStroke { next } => {
                            format!("正确！下一笔 (第 {} 笔)", next + 1)
                        }
                        QuizEvent::Complete { total_mistakes } => {
                            format!("练习完成！共 {total_mistakes} 处错误")
                        }
                    };
                }
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    /// A simple rotating ASCII spinner character driven by `spinner_phase`.
    fn spinner_char(&self) -> char {
        let chars = ['|', '/', '-', '\\'];
        let idx = (self.spinner_phase as usize) % chars.len();
        chars[idx]
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for HanziApp {
    /// Called every frame by eframe. Polls channels, advances the stroke
    /// animation, then renders the current query state.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results();

        // --- Advance animations -------------------------------------------
        self.spinner_phase += 0.08;
        if self.spinner_phase >= 4.0 {
            self.spinner_phase = 0.0;
        }
        let dt = ctx.input(|i| i.stable_dt).min(0.1);
        if let Some(writer) = self.stroke_writer.as_mut() {
            writer.advance(dt);
        }

        // --- Schedule repaints while something is in motion ---------------
        let animating = self
            .stroke_writer
            .as_ref()
            .is_some_and(|w| w.is_animating());
        if animating {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else if self.query.status.is_busy()
            || self.strokes_loading
            || self.playback.active_text().is_some()
        {
            ctx.request_repaint_after(Duration::from_millis(66));
        }

        // --- Render --------------------------------------------------------
        ctx.set_visuals(egui::Visuals::light());
        let frame = egui::Frame::new()
            .fill(PAPER)
            .inner_margin(egui::Margin::symmetric(24, 8));

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.draw_header(ui);
                    self.draw_input(ui);
                    ui.add_space(18.0);

                    match self.query.status {
                        QueryStatus::Idle => {}
                        QueryStatus::Loading => self.draw_loading(ui),
                        QueryStatus::Error => self.draw_error(ui),
                        QueryStatus::Success => {
                            if let Some(record) = self.query.record.clone() {
                                self.draw_record(ui, &record);
                            }
                        }
                    }
                });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("character explorer closing");
    }
}
