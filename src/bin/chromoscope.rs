use chromoscope::{about, app};
use eframe::{NativeOptions, egui};
use std::env;
use std::path::PathBuf;

#[cfg(target_os = "macos")]
fn configure_macos_process_name() {
    use objc2_foundation::{NSProcessInfo, ns_string};
    // Winit builds the macOS app menu title from NSProcessInfo::processName.
    // Set it early so the native menu shows "About Chromoscope".
    unsafe {
        NSProcessInfo::processInfo().setProcessName(ns_string!("Chromoscope"));
    }
}

#[cfg(not(target_os = "macos"))]
fn configure_macos_process_name() {}

fn parse_args(args: &[String]) -> app::AppConfig {
    let mut config = app::AppConfig::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--server" => config.server = iter.next().cloned(),
            "--chromosome" => config.chromosome = iter.next().cloned(),
            _ if arg.starts_with('-') => {
                log::warn!("ignoring unknown flag {arg}");
            }
            _ => {
                let path = PathBuf::from(arg);
                let is_gff = path
                    .to_string_lossy()
                    .trim_end_matches(".gz")
                    .ends_with("gff")
                    || path.extension().is_some_and(|ext| ext == "gff3");
                if is_gff {
                    config.gff = Some(path);
                } else {
                    config.fasta = Some(path);
                }
            }
        }
    }
    config
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    configure_macos_process_name();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }
    let config = parse_args(&args);

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 640.0])
            .with_min_inner_size([500.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Chromoscope",
        options,
        Box::new(move |_cc| Ok(Box::new(app::ChromoscopeApp::new(config)))),
    )
}
