use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};
use image::ImageReader;

use crate::io::{mime_for_path, outputs_dir, parse_scan_output};
use crate::model::AppState;
use omr_scan_common::{
    answer_label, format_file_size, output_filename, sorted_question_ids, subject_label, FileMeta,
    ScanResult, UploadEvent, SUBJECT_FULL_SCORE,
};

pub struct DesktopApp {
    state: AppState,
    status: String,
    process_rx: Option<Receiver<UiMessage>>,
    textures: HashMap<String, egui::TextureHandle>,
    image_rx: Receiver<ImageData>,
    image_tx: mpsc::Sender<ImageData>,
    image_inflight: HashSet<String>,
    pending_images: Vec<ImageData>,
}

enum UiMessage {
    ProcessDone(Result<ScanResult, String>),
}

struct ImageData {
    path: String,
    size: [usize; 2],
    pixels: Vec<u8>,
}

impl DesktopApp {
    fn select_image(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &["png", "jpg", "jpeg", "gif", "bmp", "webp"])
            .pick_file()
        {
            self.apply_selection(path);
        }
    }

    fn apply_selection(&mut self, path: PathBuf) {
        if self.state.session.is_processing() {
            return;
        }

        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let meta = FileMeta::new(name.clone(), size, mime_for_path(&path));
        let accepted = meta.is_image();

        let session = self.state.session.clone();
        self.state.session = session.apply(UploadEvent::FileChosen(meta));

        if accepted {
            self.state.selected_path = Some(path);
            self.textures.clear();
            self.status = format!("Selected {name}");
        }
    }

    fn remove_file(&mut self) {
        if self.state.session.is_processing() {
            return;
        }
        let session = self.state.session.clone();
        self.state.session = session.apply(UploadEvent::FileRemoved);
        self.state.selected_path = None;
        self.textures.clear();
        self.status = String::new();
    }

    fn run_process(&mut self) {
        let before = self.state.session.clone();
        let next = before.clone().apply(UploadEvent::ProcessRequested);
        let started = next.is_processing() && !before.is_processing();
        self.state.session = next;
        if !started {
            return;
        }

        let Some(path) = self.state.selected_path.clone() else {
            return;
        };

        self.textures.clear();
        self.status = "Processing...".to_string();

        let cli = resolve_cli_binary();
        let save_dir = outputs_dir();
        let (tx, rx) = mpsc::channel();
        self.process_rx = Some(rx);

        std::thread::spawn(move || {
            let result = std::process::Command::new(cli)
                .args([
                    "process",
                    path.to_string_lossy().as_ref(),
                    "--json",
                    "--save-outputs",
                    save_dir.to_string_lossy().as_ref(),
                ])
                .output();

            let message = match result {
                Ok(out) if out.status.success() => match parse_scan_output(&out.stdout) {
                    Ok(result) => UiMessage::ProcessDone(Ok(result)),
                    Err(err) => UiMessage::ProcessDone(Err(format!("Bad CLI output: {err}"))),
                },
                Ok(out) => {
                    let stderr = String::from_utf8_lossy(&out.stderr);
                    UiMessage::ProcessDone(Err(stderr.trim().to_string()))
                }
                Err(err) => UiMessage::ProcessDone(Err(format!("CLI launch failed: {err}"))),
            };
            let _ = tx.send(message);
        });
    }

    fn poll_messages(&mut self) {
        while let Ok(msg) = self.image_rx.try_recv() {
            self.image_inflight.remove(&msg.path);
            self.pending_images.push(msg);
        }

        if let Some(rx) = &self.process_rx {
            if let Ok(UiMessage::ProcessDone(outcome)) = rx.try_recv() {
                self.process_rx = None;
                let session = self.state.session.clone();
                match outcome {
                    Ok(result) => {
                        self.status = "Done".to_string();
                        self.state.session =
                            session.apply(UploadEvent::ProcessSucceeded(result));
                    }
                    Err(message) => {
                        self.status = String::new();
                        self.state.session = session.apply(UploadEvent::ProcessFailed(message));
                    }
                }
            }
        }
    }

    /// Decode a downloaded output image off the UI thread.
    fn request_image(&mut self, path: &str) {
        if path.is_empty() || self.textures.contains_key(path) || self.image_inflight.contains(path)
        {
            return;
        }
        self.image_inflight.insert(path.to_string());
        let sender = self.image_tx.clone();
        let path_owned = path.to_string();

        std::thread::spawn(move || {
            let image = ImageReader::open(&path_owned)
                .ok()
                .and_then(|r| r.decode().ok());
            if let Some(image) = image {
                let scaled = image.thumbnail(640, 640);
                let size = [scaled.width() as usize, scaled.height() as usize];
                let pixels = scaled.to_rgba8().into_raw();
                let _ = sender.send(ImageData {
                    path: path_owned,
                    size,
                    pixels,
                });
            } else {
                let _ = sender.send(ImageData {
                    path: path_owned,
                    size: [0, 0],
                    pixels: Vec::new(),
                });
            }
        });
    }

    fn process_pending_images(&mut self, ctx: &egui::Context) {
        let pending = std::mem::take(&mut self.pending_images);
        for msg in pending {
            if msg.size[0] == 0 || msg.size[1] == 0 {
                continue;
            }
            let color_image = egui::ColorImage::from_rgba_unmultiplied(msg.size, &msg.pixels);
            let texture = ctx.load_texture(&msg.path, color_image, egui::TextureOptions::default());
            self.textures.insert(msg.path, texture);
        }
    }

    fn render_upload_section(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let picking_enabled = !self.state.session.is_processing();
            if ui
                .add_enabled(picking_enabled, egui::Button::new("Select Image..."))
                .clicked()
            {
                self.select_image();
            }
            ui.label(RichText::new("or drop an image onto the window").color(Color32::from_gray(140)));
        });

        if let Some(meta) = self.state.session.file.clone() {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new(&meta.name).strong());
                ui.label(
                    RichText::new(format_file_size(meta.size)).color(Color32::from_gray(160)),
                );
                if ui
                    .add_enabled(!self.state.session.is_processing(), egui::Button::new("Remove"))
                    .clicked()
                {
                    self.remove_file();
                }
            });
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(
                    self.state.session.can_process(),
                    egui::Button::new("Process Sheet"),
                )
                .clicked()
            {
                self.run_process();
            }
            if self.state.session.is_processing() {
                ui.add(egui::Spinner::new());
                ui.label("Processing...");
            }
        });

        if let Some(message) = self.state.session.error_message() {
            ui.add_space(6.0);
            ui.label(RichText::new(message).color(Color32::from_rgb(220, 80, 80)));
        }
    }

    fn render_results(&mut self, ui: &mut egui::Ui) {
        let Some(result) = self.state.session.result().cloned() else {
            return;
        };

        ui.separator();
        ui.heading(format!("Total Score: {}", result.total_score));

        if !result.per_subject_scores.is_empty() {
            ui.add_space(8.0);
            ui.label(RichText::new("Subject Scores").strong());
            egui::Grid::new("subject_scores")
                .striped(true)
                .min_col_width(90.0)
                .show(ui, |ui| {
                    for (subject, score) in &result.per_subject_scores {
                        ui.label(subject_label(subject));
                        ui.label(format!("{}/{}", score, SUBJECT_FULL_SCORE));
                        ui.end_row();
                    }
                });
        }

        if !result.answers.is_empty() {
            ui.add_space(8.0);
            ui.label(RichText::new("Detected Answers").strong());
            egui::Grid::new("answers")
                .striped(true)
                .min_col_width(60.0)
                .show(ui, |ui| {
                    for id in sorted_question_ids(result.answers.keys().map(|k| k.as_str())) {
                        let answer = result.answers.get(id).map(String::as_str).unwrap_or("");
                        ui.label(id);
                        ui.label(answer_label(answer));
                        ui.end_row();
                    }
                });
        }

        let images = [
            ("Rectified", result.paths.rectified.as_deref()),
            ("Overlay", result.paths.overlay.as_deref()),
        ];
        ui.add_space(8.0);
        ui.horizontal_top(|ui| {
            for (label, server_path) in images {
                let Some(name) = server_path.and_then(output_filename) else {
                    continue;
                };
                let local = outputs_dir().join(name);
                let key = local.to_string_lossy().to_string();
                ui.vertical(|ui| {
                    ui.label(RichText::new(label).strong());
                    let image_size = egui::vec2(320.0, 240.0);
                    if let Some(texture) = self.textures.get(&key) {
                        ui.add(egui::Image::new(texture).fit_to_exact_size(image_size));
                    } else if local.exists() {
                        self.request_image(&key);
                        ui.allocate_ui_with_layout(
                            image_size,
                            egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                            |ui| {
                                ui.label("Loading...");
                            },
                        );
                    } else {
                        // download failed or the file 404'd on the server
                        ui.allocate_ui_with_layout(
                            image_size,
                            egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                            |ui| {
                                ui.label("Image not available");
                            },
                        );
                    }
                });
                ui.add_space(12.0);
            }
        });
    }
}

pub fn configure_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();
    let candidates = [
        r"C:\Windows\Fonts\meiryo.ttc",
        r"C:\Windows\Fonts\msgothic.ttc",
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ];

    for path in candidates {
        if let Ok(data) = std::fs::read(path) {
            fonts
                .font_data
                .insert("jp_fallback".to_string(), FontData::from_owned(data));
            fonts
                .families
                .entry(FontFamily::Proportional)
                .or_default()
                .insert(0, "jp_fallback".to_string());
            fonts
                .families
                .entry(FontFamily::Monospace)
                .or_default()
                .insert(0, "jp_fallback".to_string());
            ctx.set_fonts(fonts);
            return;
        }
    }
}

impl Default for DesktopApp {
    fn default() -> Self {
        let (image_tx, image_rx) = mpsc::channel();
        Self {
            state: AppState::default(),
            status: String::new(),
            process_rx: None,
            textures: HashMap::new(),
            image_rx,
            image_tx,
            image_inflight: HashSet::new(),
            pending_images: Vec::new(),
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.session.is_processing()
            || !self.image_inflight.is_empty()
            || !self.pending_images.is_empty()
        {
            ctx.request_repaint();
        }
        self.poll_messages();
        self.process_pending_images(ctx);

        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(path) = dropped.into_iter().filter_map(|f| f.path).next() {
            self.apply_selection(path);
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("OMR Scan Client");
                ui.separator();
                if !self.status.is_empty() {
                    ui.label(RichText::new(&self.status).color(Color32::from_gray(170)));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_upload_section(ui);
                self.render_results(ui);
            });
        });
    }
}

fn resolve_cli_binary() -> PathBuf {
    let names = if cfg!(windows) {
        &["omr-scan-rust.exe"][..]
    } else {
        &["omr-scan-rust"][..]
    };
    let exe = std::env::current_exe().ok();
    if let Some(base_dir) = exe.as_ref().and_then(|p| p.parent()) {
        for name in names {
            let local = base_dir.join(name);
            if local.exists() {
                return local;
            }
        }
        if let Some(target_dir) = base_dir.parent() {
            for profile in ["debug", "release"] {
                for name in names {
                    let sibling = target_dir.join(profile).join(name);
                    if sibling.exists() {
                        return sibling;
                    }
                }
            }
        }
    }
    PathBuf::from("omr-scan-rust")
}
