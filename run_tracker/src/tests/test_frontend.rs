use super::get_test_folder;
use crate::{
    cli::Command,
    frontend::{Frontend, FrontendError},
};
use chrono::NaiveDate;
use common::{distance::EntryError, test_helper::fixed_day_clock::FixedDayClock};
use module_core::{EventBus, Module, test_helper::stop_module};
use run_log::RunLog;
use std::path::{Path, PathBuf};
use storage::FlatFileStorage;
use track_view::{Theme, TrackView};

type TestFrontend = Frontend<&'static [u8], Vec<u8>, FixedDayClock>;

fn spawn<M: Module + Send + 'static>(module: M) -> tokio::task::JoinHandle<Result<(), ()>> {
    tokio::spawn(async move {
        let mut module = module;
        module.run().await
    })
}

struct Setup {
    event_bus: EventBus,
    modules: Vec<tokio::task::JoinHandle<Result<(), ()>>>,
    frontend: TestFrontend,
}

impl Setup {
    fn new(data_file: &Path, input: &'static [u8]) -> Self {
        let event_bus = EventBus::default();
        let modules = vec![
            spawn(FlatFileStorage::new(data_file, event_bus.context())),
            spawn(RunLog::new_with_clock(
                1000.0,
                FixedDayClock::ymd(2024, 1, 5),
                event_bus.context(),
            )),
            spawn(TrackView::new_with_clock(
                Theme::default(),
                FixedDayClock::ymd(2024, 1, 5),
                event_bus.context(),
            )),
        ];
        let frontend = Frontend::new_with_clock(
            event_bus.context(),
            input,
            vec![],
            FixedDayClock::ymd(2024, 1, 5),
        );
        Setup {
            event_bus,
            modules,
            frontend,
        }
    }

    fn output(&self) -> String {
        String::from_utf8(self.frontend.output().clone()).unwrap()
    }

    async fn stop(mut self) {
        for module in self.modules.iter_mut() {
            stop_module(&self.event_bus, module).await;
        }
    }
}

fn data_file(name: &str) -> PathBuf {
    get_test_folder(name).join("runs.txt")
}

fn add(distance: &str, date: Option<NaiveDate>) -> Command {
    Command::Add {
        distance: distance.to_owned(),
        date,
    }
}

#[tokio::test]
#[test_log::test]
async fn add_defaults_to_today() {
    let data_file = data_file("add_defaults_to_today");
    let mut setup = Setup::new(&data_file, b"");

    setup.frontend.execute(&add("5,5", None)).await.unwrap();

    assert_eq!(setup.output(), "Added 5.50 km on 2024-01-05\n");
    assert_eq!(std::fs::read_to_string(&data_file).unwrap(), "2024-01-05,5.5\n");
    setup.stop().await;
}

#[tokio::test]
#[test_log::test]
async fn add_invalid_distance_fails() {
    let data_file = data_file("add_invalid_distance_fails");
    let mut setup = Setup::new(&data_file, b"");

    let result = setup.frontend.execute(&add("", None)).await;

    assert!(matches!(result, Err(FrontendError::Entry(EntryError::Empty))));
    assert_eq!(setup.output(), "");
    assert!(!data_file.exists());
    setup.stop().await;
}

#[tokio::test]
#[test_log::test]
async fn list_and_stats() {
    let data_file = data_file("list_and_stats");
    let mut setup = Setup::new(&data_file, b"");
    let date = NaiveDate::from_ymd_opt(2024, 1, 1);
    setup.frontend.execute(&add("5.5", date)).await.unwrap();
    setup.frontend.execute(&add("3.25", NaiveDate::from_ymd_opt(2024, 1, 2))).await.unwrap();
    setup.frontend.execute(&add("10", NaiveDate::from_ymd_opt(2024, 1, 4))).await.unwrap();

    setup.frontend.execute(&Command::List).await.unwrap();
    setup.frontend.execute(&Command::Stats { json: false }).await.unwrap();

    let output = setup.output();
    assert!(output.contains(&format!("{:<15}{:>10.2} km\n", "2024-01-02", 3.25)));
    assert!(output.contains("Total: 18.75 km\n"));
    assert!(output.contains("Entries: 3\n"));
    assert!(output.contains("Ahead by: 5.05 km\n"));
    setup.stop().await;
}

#[tokio::test]
#[test_log::test]
async fn stats_as_json() {
    let data_file = data_file("stats_as_json");
    let mut setup = Setup::new(&data_file, b"");

    setup.frontend.execute(&Command::Stats { json: true }).await.unwrap();

    let json: serde_json::Value = serde_json::from_str(&setup.output()).unwrap();
    assert_eq!(json["entry_count"], 0);
    assert_eq!(json["goal_km"], 1000.0);
    setup.stop().await;
}

#[tokio::test]
#[test_log::test]
async fn clear_needs_confirmation() {
    let data_file = data_file("clear_needs_confirmation");
    std::fs::write(&data_file, "2024-01-01,5.5\n").unwrap();
    let mut setup = Setup::new(&data_file, b"n\n");

    setup.frontend.execute(&Command::Clear { yes: false }).await.unwrap();

    assert_eq!(setup.output(), "Remove all entries? [y/N] Nothing removed\n");
    assert_eq!(std::fs::read_to_string(&data_file).unwrap(), "2024-01-01,5.5\n");
    setup.stop().await;
}

#[tokio::test]
#[test_log::test]
async fn clear_confirmed() {
    let data_file = data_file("clear_confirmed");
    std::fs::write(&data_file, "2024-01-01,5.5\n2024-01-02,1\n").unwrap();
    let mut setup = Setup::new(&data_file, b"yes\n");

    setup.frontend.execute(&Command::Clear { yes: false }).await.unwrap();

    assert_eq!(setup.output(), "Remove all entries? [y/N] Removed 2 entries\n");
    assert_eq!(std::fs::read_to_string(&data_file).unwrap(), "");
    setup.stop().await;
}

#[tokio::test]
#[test_log::test]
async fn remove_last() {
    let data_file = data_file("remove_last");
    std::fs::write(&data_file, "2024-01-01,5.5\n2024-01-02,1\n").unwrap();
    let mut setup = Setup::new(&data_file, b"");

    setup.frontend.execute(&Command::RemoveLast).await.unwrap();
    setup.frontend.execute(&Command::RemoveLast).await.unwrap();
    setup.frontend.execute(&Command::RemoveLast).await.unwrap();

    assert_eq!(
        setup.output(),
        "Removed 1.00 km on 2024-01-02\nRemoved 5.50 km on 2024-01-01\nNo entries to remove\n"
    );
    setup.stop().await;
}

#[tokio::test]
#[test_log::test]
async fn render_uses_loaded_progress() {
    let data_file = data_file("render_uses_loaded_progress");
    std::fs::write(&data_file, "2024-01-01,250\n").unwrap();
    let mut setup = Setup::new(&data_file, b"");

    setup
        .frontend
        .execute(&Command::Render {
            output: None,
            width: 500.0,
            height: 450.0,
        })
        .await
        .unwrap();

    let svg = setup.output();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(">25.0%</text>"));
    assert!(svg.contains(">250.0 / 1000 km</text>"));
    setup.stop().await;
}

#[tokio::test]
#[test_log::test]
async fn render_to_file() {
    let folder = get_test_folder("render_to_file");
    let svg_file = folder.join("track.svg");
    let mut setup = Setup::new(&folder.join("runs.txt"), b"");

    setup
        .frontend
        .execute(&Command::Render {
            output: Some(svg_file.clone()),
            width: 800.0,
            height: 600.0,
        })
        .await
        .unwrap();

    let svg = std::fs::read_to_string(&svg_file).unwrap();
    assert!(svg.contains("width=\"800\" height=\"600\""));
    assert_eq!(setup.output(), format!("Wrote {}\n", svg_file.display()));
    setup.stop().await;
}

#[tokio::test]
#[test_log::test]
async fn render_rejects_too_small_viewport() {
    let data_file = data_file("render_rejects_too_small_viewport");
    let mut setup = Setup::new(&data_file, b"");

    for (width, height) in [(0.0, 450.0), (100.0, 100.0), (399.0, 350.0), (400.0, f64::NAN)] {
        let result = setup
            .frontend
            .execute(&Command::Render {
                output: None,
                width,
                height,
            })
            .await;
        assert!(
            matches!(result, Err(FrontendError::InvalidViewport { .. })),
            "{width}x{height} was accepted"
        );
    }

    setup
        .frontend
        .execute(&Command::Render {
            output: None,
            width: 400.0,
            height: 350.0,
        })
        .await
        .unwrap();
    assert!(setup.output().contains("width=\"400\" height=\"350\""));
    setup.stop().await;
}

#[tokio::test]
#[test_log::test]
async fn run_stops_all_modules() {
    let data_file = data_file("run_stops_all_modules");
    let Setup {
        modules,
        mut frontend,
        event_bus: _event_bus,
    } = Setup::new(&data_file, b"");

    frontend.run(&Command::List).await.unwrap();

    for module in modules {
        tokio::time::timeout(std::time::Duration::from_millis(100), module)
            .await
            .expect("Module did not stop")
            .unwrap()
            .unwrap();
    }
}
