//! egui main window.

use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

use parquet_viewer::background::{BackgroundLoader, JobUpdate, LoadOutcome};
use parquet_viewer::config::Settings;
use parquet_viewer::diff;
use parquet_viewer::export::{self, ExportFormat, ExportMode, ExportOptions};
use parquet_viewer::loader::{self, FileKind, LoadOptions};
use parquet_viewer::pagination::{PAGE_SIZES, Pagination};
use parquet_viewer::schema::SchemaDocument;
use parquet_viewer::search::{self, SearchTerm};
use parquet_viewer::table_model::TableModel;

const APP_TITLE: &str = "Parquet Viewer";
const ROW_HEIGHT: f32 = 20.0;

/// A file and the options it was opened with, kept for Refresh.
#[derive(Clone)]
struct OpenFile {
    path: PathBuf,
    options: LoadOptions,
}

struct Notice {
    title: String,
    message: String,
    details: Option<String>,
}

#[derive(Clone, Copy, PartialEq)]
enum Quoting {
    Minimal,
    Off,
}

/// Options dialog shown before a delimited text file is loaded.
struct TextDialog {
    path: PathBuf,
    separator: String,
    has_header: bool,
    infer_types: bool,
    quoting: Quoting,
}

impl TextDialog {
    fn options(&self) -> Option<LoadOptions> {
        let separator = match self.separator.as_str() {
            "\\t" | "tab" => b'\t',
            s => {
                let c = s.chars().next()?;
                c.is_ascii().then_some(c as u8)?
            }
        };
        Some(LoadOptions {
            separator: Some(separator),
            has_header: self.has_header,
            infer_types: self.infer_types,
            quote_char: match self.quoting {
                Quoting::Minimal => Some(b'"'),
                Quoting::Off => None,
            },
            ..LoadOptions::default()
        })
    }
}

#[derive(Clone, Copy, PartialEq)]
enum ModeChoice {
    Head,
    Tail,
    Random,
    All,
}

struct ExportDialog {
    mode: ModeChoice,
    rows: usize,
    format: ExportFormat,
    separator: String,
    exclude: String,
}

impl ExportDialog {
    fn mode(&self) -> ExportMode {
        match self.mode {
            ModeChoice::Head => ExportMode::Head(self.rows),
            ModeChoice::Tail => ExportMode::Tail(self.rows),
            ModeChoice::Random => ExportMode::Random(self.rows),
            ModeChoice::All => ExportMode::All,
        }
    }
}

pub struct ViewerApp {
    settings: Settings,
    settings_path: PathBuf,
    loader: BackgroundLoader,
    model: TableModel,
    pagination: Pagination,
    search: String,
    hits: Vec<(usize, usize)>,
    hit_idx: usize,
    scroll_to: Option<usize>,
    current: Option<OpenFile>,
    pending: Option<OpenFile>,
    progress: Option<f32>,
    status: String,
    notice: Option<Notice>,
    text_dialog: Option<TextDialog>,
    export_dialog: Option<ExportDialog>,
    show_schema: bool,
    quit: bool,
}

impl ViewerApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        settings_path: PathBuf,
    ) -> anyhow::Result<Self> {
        let mut model = TableModel::empty();
        let ctx = cc.egui_ctx.clone();
        model.set_refresh_hook(move |_| ctx.request_repaint());
        Ok(Self {
            settings,
            settings_path,
            loader: BackgroundLoader::new()?,
            model,
            pagination: Pagination::default(),
            search: String::new(),
            hits: Vec::new(),
            hit_idx: 0,
            scroll_to: None,
            current: None,
            pending: None,
            progress: None,
            status: "Ready".to_string(),
            notice: None,
            text_dialog: None,
            export_dialog: None,
            show_schema: false,
            quit: false,
        })
    }

    fn notify(&mut self, title: &str, message: impl Into<String>) {
        self.notice = Some(Notice {
            title: title.to_string(),
            message: message.into(),
            details: None,
        });
    }

    fn fail(&mut self, action: &str, err: impl std::fmt::Display) {
        error!("{action} failed: {err}");
        self.notify("Error", format!("{action} failed:\n{err}"));
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save(&self.settings_path) {
            warn!("Could not save settings: {e}");
        }
    }

    fn file_label(&self) -> String {
        self.current
            .as_ref()
            .map(|f| {
                let (stem, ext) = loader::split_file_name(&f.path);
                format!("{stem}.{ext}")
            })
            .unwrap_or_default()
    }

    fn file_stem(&self) -> String {
        self.current
            .as_ref()
            .map(|f| loader::split_file_name(&f.path).0)
            .unwrap_or_default()
    }

    // --- opening files ---------------------------------------------------

    fn pick_file(&self, name: &str, extensions: &[&str]) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().add_filter(name, extensions);
        if let Some(dir) = &self.settings.last_directory {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_file()
    }

    fn save_dialog(&self, name: &str, extensions: &[&str], file_name: String) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new()
            .add_filter(name, extensions)
            .set_file_name(file_name);
        if let Some(dir) = &self.settings.last_directory {
            dialog = dialog.set_directory(dir);
        }
        dialog.save_file()
    }

    /// Parquet loads right away, delimited text asks for options first.
    fn open_path(&mut self, path: PathBuf) {
        let kind = match FileKind::detect(&path) {
            Ok(kind) => kind,
            Err(e) => {
                self.notify("Warning", e.to_string());
                return;
            }
        };
        if kind == FileKind::Parquet {
            self.start_load(path, LoadOptions::default());
            return;
        }
        let defaults = &self.settings.text_defaults;
        let separator = match kind {
            FileKind::Text => defaults.separator,
            other => other.default_separator() as char,
        };
        self.text_dialog = Some(TextDialog {
            path,
            separator: if separator == '\t' {
                "\\t".to_string()
            } else {
                separator.to_string()
            },
            has_header: defaults.has_header,
            infer_types: defaults.infer_types,
            quoting: Quoting::Minimal,
        });
    }

    fn start_load(&mut self, path: PathBuf, options: LoadOptions) {
        self.status = format!(
            "Loading {}...",
            path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
        );
        self.progress = Some(0.0);
        self.loader.load(path.clone(), options.clone());
        self.pending = Some(OpenFile { path, options });
    }

    fn poll_loader(&mut self, ctx: &egui::Context) {
        match self.loader.poll() {
            Some(JobUpdate::Progress(p)) => self.progress = Some(p),
            Some(JobUpdate::Done(LoadOutcome::Success(frame))) => {
                self.progress = None;
                self.model.replace(frame);
                self.search.clear();
                self.refresh_hits();
                self.pagination.first_page();
                self.current = self.pending.take();
                self.status = format!("Total records: {}", self.model.total_rows());
                if let Some(file) = &self.current {
                    self.settings.add_recent_file(&file.path);
                    self.save_settings();
                }
            }
            Some(JobUpdate::Done(LoadOutcome::Failure(failure))) => {
                self.progress = None;
                self.pending = None;
                self.status = "Error loading file".to_string();
                self.notify(
                    "Error",
                    format!(
                        "Could not load {}:\n{}",
                        failure.path.display(),
                        failure.message
                    ),
                );
            }
            None => {}
        }
        if self.loader.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn close_file(&mut self) {
        self.loader.cancel();
        self.pending = None;
        self.progress = None;
        self.model.clear();
        self.current = None;
        self.search.clear();
        self.refresh_hits();
        self.pagination.first_page();
        self.status = "Ready".to_string();
    }

    fn refresh(&mut self) {
        match self.current.clone() {
            Some(file) => self.start_load(file.path, file.options),
            None => self.status = "No file to refresh".to_string(),
        }
    }

    // --- filter and hits -------------------------------------------------

    fn apply_filter(&mut self) {
        self.model.set_filter(&self.search);
        self.pagination.first_page();
        self.refresh_hits();
    }

    /// Recompute matching cells on the current page.
    fn refresh_hits(&mut self) {
        self.hit_idx = 0;
        self.hits = if self.search.is_empty() {
            Vec::new()
        } else {
            let range = self.pagination.range(self.model.row_count());
            search::find_matches(&self.model.rows(range), &self.search, true)
        };
        self.scroll_to = self.hits.first().map(|(r, _)| *r);
    }

    fn step_hit(&mut self, forward: bool) {
        self.hit_idx = if forward {
            search::next_index(self.hit_idx, &self.hits)
        } else {
            search::prev_index(self.hit_idx, &self.hits)
        };
        self.scroll_to = self.hits.get(self.hit_idx).map(|(r, _)| *r);
    }

    // --- export and schema -----------------------------------------------

    fn require_data(&mut self, action: &str) -> bool {
        if self.model.is_empty() {
            self.notify("Info", format!("No records to {action}."));
            return false;
        }
        true
    }

    fn run_export(&mut self) {
        let Some(dialog) = self.export_dialog.take() else {
            return;
        };
        let Some(separator) = dialog.separator.chars().next().filter(char::is_ascii).map(|c| c as u8)
        else {
            self.notify("Warning", "Separator must be a single ASCII character.");
            self.export_dialog = Some(dialog);
            return;
        };
        let (label, exts): (&str, &[&str]) = match dialog.format {
            ExportFormat::Csv => ("CSV Files", &["csv"]),
            ExportFormat::CsvGzip => ("Gzip CSV Files", &["gz"]),
            ExportFormat::Parquet => ("Parquet Files", &["parquet"]),
        };
        let suggested = loader::export_file_name(&self.file_stem(), dialog.format);
        let Some(path) = self.save_dialog(label, exts, suggested) else {
            return;
        };
        let options = ExportOptions {
            separator,
            exclude_columns: dialog
                .exclude
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            seed: None,
        };
        let result = self
            .model
            .visible_frame()
            .and_then(|frame| export::export(&frame, dialog.mode(), dialog.format, &path, &options));
        match result {
            Ok(rows) => {
                self.status = format!("Exported {rows} rows to {}", display_name(&path));
            }
            Err(e) => self.fail("Export", e),
        }
    }

    fn current_schema(&self) -> SchemaDocument {
        let label = self.file_label();
        let source = (!label.is_empty()).then_some(label.as_str());
        SchemaDocument::from_frame(self.model.frame(), source)
    }

    fn export_schema_json(&mut self) {
        if !self.require_data("export schema") {
            return;
        }
        let name = format!("{}_schema.json", self.file_stem());
        let Some(path) = self.save_dialog("JSON Files", &["json"], name) else {
            return;
        };
        match self.current_schema().write_json(&path) {
            Ok(()) => self.status = "Schema exported to JSON".to_string(),
            Err(e) => self.fail("Schema JSON export", e),
        }
    }

    fn export_schema_excel(&mut self) {
        if !self.require_data("export schema") {
            return;
        }
        let name = format!("{}_schema.xlsx", self.file_stem());
        let Some(path) = self.save_dialog("Excel Files", &["xlsx"], name) else {
            return;
        };
        match self.current_schema().write_excel(&path) {
            Ok(()) => self.status = "Schema exported to Excel".to_string(),
            Err(e) => self.fail("Schema Excel export", e),
        }
    }

    fn compare_schemas(&mut self) {
        let Some(left) = self.pick_file("JSON Files", &["json"]) else {
            return;
        };
        let Some(right) = self.pick_file("JSON Files", &["json"]) else {
            return;
        };
        match diff::diff_files(&left, &right) {
            Ok(report) if report.is_empty() => {
                self.notify("Result", report.to_string());
            }
            Ok(report) => {
                self.notice = Some(Notice {
                    title: "Schema Differences".to_string(),
                    message: format!(
                        "Schemas differ: {} difference(s) found.",
                        report.total_differences()
                    ),
                    details: Some(report.to_string()),
                });
            }
            Err(e) => self.fail("Comparison", e),
        }
    }

    // --- drawing ---------------------------------------------------------

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        use egui::{Key, KeyboardShortcut, Modifiers};
        let pressed = |key| {
            ctx.input_mut(|i| i.consume_shortcut(&KeyboardShortcut::new(Modifiers::COMMAND, key)))
        };
        if pressed(Key::O) {
            if let Some(path) = self.pick_file("Data Files", &["parquet", "csv", "gz", "txt"]) {
                self.open_path(path);
            }
        }
        if pressed(Key::W) {
            self.close_file();
        }
        if pressed(Key::Q) {
            self.quit = true;
        }
        if pressed(Key::E) && self.require_data("export") {
            self.export_dialog = Some(default_export_dialog());
        }
        if pressed(Key::S) && self.require_data("show the schema of") {
            self.show_schema = true;
        }

        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(path) = dropped.into_iter().next() {
            self.open_path(path);
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    for (label, name, exts) in [
                        ("Open Parquet...", "Parquet Files", &["parquet"][..]),
                        ("Open CSV...", "CSV Files", &["csv"][..]),
                        ("Open CSV.GZ...", "Gzip CSV Files", &["gz"][..]),
                        ("Open TXT...", "Text Files", &["txt"][..]),
                    ] {
                        if ui.button(label).clicked() {
                            ui.close_menu();
                            if let Some(path) = self.pick_file(name, exts) {
                                self.open_path(path);
                            }
                        }
                    }
                    ui.menu_button("Recent", |ui| {
                        let recent = self.settings.existing_recent_files();
                        if recent.is_empty() {
                            ui.label("No recent files");
                        }
                        for path in recent {
                            if ui.button(path.display().to_string()).clicked() {
                                ui.close_menu();
                                self.open_path(path);
                            }
                        }
                    });
                    ui.separator();
                    if ui.button("Refresh").clicked() {
                        ui.close_menu();
                        self.refresh();
                    }
                    if ui.button("Close").clicked() {
                        ui.close_menu();
                        self.close_file();
                    }
                    if ui.button("Quit").clicked() {
                        ui.close_menu();
                        self.quit = true;
                    }
                });
                ui.menu_button("Export", |ui| {
                    if ui.button("Data...").clicked() {
                        ui.close_menu();
                        if self.require_data("export") {
                            self.export_dialog = Some(default_export_dialog());
                        }
                    }
                    if ui.button("Schema to JSON...").clicked() {
                        ui.close_menu();
                        self.export_schema_json();
                    }
                    if ui.button("Schema to Excel...").clicked() {
                        ui.close_menu();
                        self.export_schema_excel();
                    }
                });
                ui.menu_button("Schema", |ui| {
                    if ui.button("View").clicked() {
                        ui.close_menu();
                        if self.require_data("show the schema of") {
                            self.show_schema = true;
                        }
                    }
                    if ui.button("Compare JSON schemas...").clicked() {
                        ui.close_menu();
                        self.compare_schemas();
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        ui.close_menu();
                        self.notify(
                            "About",
                            format!(
                                "{APP_TITLE} {}\n\nOpen, view, and export data in Parquet, CSV, \
                                 and TXT formats.\nExtract schemas and export to Excel or JSON.",
                                env!("CARGO_PKG_VERSION")
                            ),
                        );
                    }
                });
            });
        });
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status.as_str());
                if let Some(p) = self.progress {
                    ui.add(egui::ProgressBar::new(p).desired_width(160.0).animate(true));
                }
            });
        });
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        let total = self.model.row_count();
        ui.horizontal(|ui| {
            ui.label("Search:");
            if ui.text_edit_singleline(&mut self.search).changed() {
                self.apply_filter();
            }
            if !self.hits.is_empty() {
                if ui.button("Prev").clicked() {
                    self.step_hit(false);
                }
                if ui.button("Next").clicked() {
                    self.step_hit(true);
                }
                ui.label(format!("{} / {}", self.hit_idx + 1, self.hits.len()));
            }
            ui.separator();
            if ui.button("Previous page").clicked() && self.pagination.previous_page() {
                self.refresh_hits();
            }
            if ui.button("Next page").clicked() && self.pagination.next_page(total) {
                self.refresh_hits();
            }
            let mut size = self.pagination.page_size();
            egui::ComboBox::from_id_salt("page_size")
                .selected_text(size.to_string())
                .show_ui(ui, |ui| {
                    for s in PAGE_SIZES {
                        ui.selectable_value(&mut size, s, s.to_string());
                    }
                });
            if size != self.pagination.page_size() {
                self.pagination.set_page_size(size);
                self.refresh_hits();
            }
            ui.label(self.pagination.summary(total));
        });
    }

    fn table(&mut self, ui: &mut egui::Ui) {
        let model = &self.model;
        let range = self.pagination.range(model.row_count());
        let columns = model.column_count();
        let term = SearchTerm::new(&self.search);
        let highlight = ui.visuals().selection.bg_fill;

        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(48.0))
            .columns(Column::auto().at_least(80.0).clip(true), columns)
            .min_scrolled_height(0.0);
        if let Some(row) = self.scroll_to.take() {
            builder = builder.scroll_to_row(row, Some(egui::Align::Center));
        }

        builder
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                for c in 0..columns {
                    header.col(|ui| {
                        ui.strong(model.header(c).unwrap_or_default());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, range.len(), |mut row| {
                    let r = range.start + row.index();
                    row.col(|ui| {
                        let label = model.row_label(r).map(|n| n.to_string()).unwrap_or_default();
                        ui.weak(label);
                    });
                    for c in 0..columns {
                        row.col(|ui| {
                            let text = model.display_cell(r, c);
                            if !term.is_empty() && term.matches(&text) {
                                ui.label(egui::RichText::new(text).background_color(highlight));
                            } else {
                                ui.label(text);
                            }
                        });
                    }
                });
            });
    }

    fn dialogs(&mut self, ctx: &egui::Context) {
        if let Some(notice) = &self.notice {
            let mut open = true;
            egui::Window::new(notice.title.as_str())
                .id(egui::Id::new("notice"))
                .collapsible(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(notice.message.as_str());
                    if let Some(details) = &notice.details {
                        egui::CollapsingHeader::new("Details").show(ui, |ui| {
                            egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                                ui.monospace(details.as_str());
                            });
                        });
                    }
                    if ui.button("OK").clicked() {
                        open = false;
                    }
                });
            if !open {
                self.notice = None;
            }
        }

        let mut load = None;
        if let Some(dialog) = &mut self.text_dialog {
            let mut close = false;
            egui::Window::new("File Options")
                .collapsible(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    egui::Grid::new("text_options").num_columns(2).show(ui, |ui| {
                        ui.label("Header:");
                        ui.checkbox(&mut dialog.has_header, "First line holds column names");
                        ui.end_row();
                        ui.label("Separator:");
                        ui.horizontal(|ui| {
                            for sep in [";", ",", "|", "\\t"] {
                                ui.selectable_value(&mut dialog.separator, sep.to_string(), sep);
                            }
                            ui.add(egui::TextEdit::singleline(&mut dialog.separator).desired_width(30.0));
                        });
                        ui.end_row();
                        ui.label("Quoting:");
                        ui.horizontal(|ui| {
                            ui.radio_value(&mut dialog.quoting, Quoting::Minimal, "Minimal");
                            ui.radio_value(&mut dialog.quoting, Quoting::Off, "None");
                        });
                        ui.end_row();
                        ui.label("Types:");
                        ui.checkbox(&mut dialog.infer_types, "Infer types");
                        ui.end_row();
                    });
                    ui.horizontal(|ui| {
                        if ui.button("OK").clicked() {
                            load = Some(dialog.options());
                        }
                        if ui.button("Cancel").clicked() {
                            close = true;
                        }
                    });
                });
            if close {
                self.text_dialog = None;
            }
        }
        match load {
            Some(Some(options)) => {
                if let Some(dialog) = self.text_dialog.take() {
                    if let Some(sep) = options.separator {
                        if matches!(FileKind::detect(&dialog.path), Ok(FileKind::Text)) {
                            self.settings.text_defaults.separator = sep as char;
                        }
                    }
                    self.settings.text_defaults.has_header = options.has_header;
                    self.settings.text_defaults.infer_types = options.infer_types;
                    self.start_load(dialog.path, options);
                }
            }
            Some(None) => self.notify("Warning", "Separator must be a single ASCII character."),
            None => {}
        }

        let mut confirm = false;
        if let Some(dialog) = &mut self.export_dialog {
            let mut close = false;
            let total = self.model.row_count();
            egui::Window::new("Export Data")
                .collapsible(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    egui::Grid::new("export_options").num_columns(2).show(ui, |ui| {
                        ui.label("Extract:");
                        ui.horizontal(|ui| {
                            ui.radio_value(&mut dialog.mode, ModeChoice::Head, "Head");
                            ui.radio_value(&mut dialog.mode, ModeChoice::Tail, "Tail");
                            ui.radio_value(&mut dialog.mode, ModeChoice::Random, "Random");
                            ui.radio_value(&mut dialog.mode, ModeChoice::All, "All");
                        });
                        ui.end_row();
                        ui.label("Rows:");
                        ui.add_enabled(
                            dialog.mode != ModeChoice::All,
                            egui::DragValue::new(&mut dialog.rows).range(0..=total),
                        );
                        ui.end_row();
                        ui.label("Format:");
                        ui.horizontal(|ui| {
                            ui.radio_value(&mut dialog.format, ExportFormat::Csv, "CSV");
                            ui.radio_value(&mut dialog.format, ExportFormat::CsvGzip, "CSV.GZ");
                            ui.radio_value(&mut dialog.format, ExportFormat::Parquet, "Parquet");
                        });
                        ui.end_row();
                        ui.label("Separator:");
                        ui.add(egui::TextEdit::singleline(&mut dialog.separator).desired_width(30.0));
                        ui.end_row();
                        ui.label("Exclude columns:");
                        ui.text_edit_singleline(&mut dialog.exclude);
                        ui.end_row();
                    });
                    ui.horizontal(|ui| {
                        if ui.button("Export...").clicked() {
                            confirm = true;
                        }
                        if ui.button("Cancel").clicked() {
                            close = true;
                        }
                    });
                });
            if close {
                self.export_dialog = None;
            }
        }
        if confirm {
            self.run_export();
        }

        if self.show_schema {
            let schema = self.current_schema();
            let mut open = true;
            let mut action = None;
            egui::Window::new("Schema")
                .open(&mut open)
                .default_width(420.0)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("Export to Excel").clicked() {
                            action = Some(false);
                        }
                        if ui.button("Export to JSON").clicked() {
                            action = Some(true);
                        }
                    });
                    egui::ScrollArea::vertical().max_height(400.0).show(ui, |ui| {
                        egui::Grid::new("schema_grid").striped(true).show(ui, |ui| {
                            ui.strong("Column Name");
                            ui.strong("Native Type");
                            ui.strong("Type");
                            ui.end_row();
                            for entry in &schema {
                                ui.label(entry.name.as_str());
                                ui.label(entry.native_type.as_deref().unwrap_or(""));
                                ui.label(entry.type_tag.as_str());
                                ui.end_row();
                            }
                        });
                    });
                });
            self.show_schema = open;
            match action {
                Some(true) => self.export_schema_json(),
                Some(false) => self.export_schema_excel(),
                None => {}
            }
        }
    }
}

fn default_export_dialog() -> ExportDialog {
    ExportDialog {
        mode: ModeChoice::Head,
        rows: 100,
        format: ExportFormat::Csv,
        separator: ",".to_string(),
        exclude: String::new(),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader(ctx);
        self.handle_shortcuts(ctx);
        self.menu_bar(ctx);
        self.status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.toolbar(ui);
            ui.separator();
            self.table(ui);
        });
        self.dialogs(ctx);

        let title = match self.file_label() {
            label if label.is_empty() => APP_TITLE.to_string(),
            label => format!("{label} - {APP_TITLE}"),
        };
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.settings.window.width = rect.width();
            self.settings.window.height = rect.height();
        }
        if self.quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Shutting down");
        self.save_settings();
    }
}

/// Load settings, open the window and block until it closes.
pub fn run() -> anyhow::Result<()> {
    let settings_path = Settings::default_path();
    let settings = Settings::load(&settings_path);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([settings.window.width, settings.window.height])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| {
            let app = ViewerApp::new(cc, settings, settings_path)?;
            Ok(Box::new(app) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
