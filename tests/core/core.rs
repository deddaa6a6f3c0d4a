use microk8s_wrappers::core::config::{Config, ReadinessConfig};
use microk8s_wrappers::core::error::WrapperError;
use microk8s_wrappers::core::exec::{ExecError, ExitOutcome, ProcessRunner};
use microk8s_wrappers::core::snap::SnapEnv;
use microk8s_wrappers::plugins::actions::{Action, ActionRegistry};
use microk8s_wrappers::plugins::catalog::AddonCatalog;
use microk8s_wrappers::plugins::cluster::{enabled_in_listing, target_state_set};
use microk8s_wrappers::plugins::readiness::{ReadinessPoller, ReadinessProbe};
use microk8s_wrappers::plugins::resolver::{AddonRequest, ResolvedPlan, resolve};
use microk8s_wrappers::plugins::xable::xable;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::tempdir;

const CATALOG: &str = r#"
microk8s-addons:
  addons:
    - name: dns
      description: CoreDNS
      version: "1.8.0"
      check_status: pod/coredns
      supported_architectures: [amd64, arm64]
    - name: storage
      description: Hostpath storage class
      version: "1.0.0"
      check_status: pod/hostpath-provisioner
      supported_architectures: [amd64, arm64]
    - name: gpu
      description: NVIDIA GPU support
      check_status: daemonset.apps/nvidia-device-plugin-daemonset
      supported_architectures: [amd64]
"#;

fn tokens(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|t| t.to_string()).collect()
}

fn names(raw: &[&str]) -> BTreeSet<String> {
    raw.iter().map(|t| t.to_string()).collect()
}

#[derive(Default)]
struct Recorder {
    calls: RefCell<Vec<(PathBuf, Vec<String>)>>,
    codes: HashMap<String, i32>,
}

impl ProcessRunner for Recorder {
    fn capture(&self, _program: &Path, _args: &[String]) -> Result<String, ExecError> {
        Ok(String::new())
    }

    fn status(&self, program: &Path, args: &[String]) -> Result<ExitOutcome, ExecError> {
        self.calls
            .borrow_mut()
            .push((program.to_path_buf(), args.to_vec()));
        let file_name = program
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(ExitOutcome {
            code: Some(self.codes.get(&file_name).copied().unwrap_or(0)),
        })
    }
}

impl Recorder {
    fn script_names(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|(p, _)| p.file_name().map(|f| f.to_string_lossy().into_owned()))
            .collect()
    }
}

#[test]
fn multi_addon_tokens_resolve_in_order_with_colon_values() {
    let existing = names(&["dns", "storage", "ingress"]);
    let plan = resolve(
        Action::Enable,
        &tokens(&["storage", "dns:1.1.1.1,8.8.8.8"]),
        &existing,
    )
    .unwrap();
    assert!(plan.is_multi());
    assert_eq!(
        plan.requests(),
        &[
            AddonRequest {
                name: "storage".to_string(),
                args: vec![],
            },
            AddonRequest {
                name: "dns".to_string(),
                args: vec!["1.1.1.1,8.8.8.8".to_string()],
            },
        ]
    );
}

#[test]
fn single_addon_forwards_trailing_flags() {
    let existing = names(&["dns", "ingress"]);
    let plan = resolve(
        Action::Enable,
        &tokens(&["ingress", "--default-ssl-certificate=ns/cert"]),
        &existing,
    )
    .unwrap();
    assert_eq!(
        plan,
        ResolvedPlan::Single(AddonRequest {
            name: "ingress".to_string(),
            args: vec!["--default-ssl-certificate=ns/cert".to_string()],
        })
    );
}

#[test]
fn colon_value_with_flags_is_rejected() {
    let existing = names(&["dns"]);
    let err = resolve(Action::Disable, &tokens(&["dns:foo", "--bar"]), &existing).unwrap_err();
    assert!(matches!(
        err,
        WrapperError::AmbiguousArgs {
            action: Action::Disable
        }
    ));
}

#[test]
fn unknown_addon_reports_what_exists() {
    let existing = names(&["dns", "storage"]);
    let err = resolve(Action::Enable, &tokens(&["nope"]), &existing).unwrap_err();
    match err {
        WrapperError::NotFound { addon, available } => {
            assert_eq!(addon, "nope");
            assert_eq!(available, vec!["dns".to_string(), "storage".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn registry_scan_picks_up_scripts_per_action() {
    let tmp = tempdir().expect("tempdir");
    for name in [
        "enable.dns.sh",
        "disable.dns.sh",
        "enable.storage.sh",
        "enable.notes.txt",
        "README",
    ] {
        fs::write(tmp.path().join(name), "#!/bin/sh\n").expect("write script");
    }

    let registry = ActionRegistry::scan(tmp.path()).expect("scan");
    assert_eq!(registry.existing(Action::Enable), names(&["dns", "storage"]));
    assert_eq!(registry.existing(Action::Disable), names(&["dns"]));
    assert_eq!(
        registry.script(Action::Disable, "dns"),
        Some(tmp.path().join("disable.dns.sh").as_path())
    );
    assert!(registry.script(Action::Disable, "storage").is_none());
}

#[test]
fn registry_scan_of_missing_dir_is_empty() {
    let tmp = tempdir().expect("tempdir");
    let registry = ActionRegistry::scan(&tmp.path().join("absent")).expect("scan");
    assert!(registry.existing(Action::Enable).is_empty());
}

#[test]
fn xable_dispatches_sequentially_and_skips_enabled() {
    let dir = Path::new("/actions");
    let registry = ActionRegistry::with_scripts(
        dir,
        [
            (Action::Enable, "dns"),
            (Action::Enable, "storage"),
            (Action::Enable, "ingress"),
        ],
    );
    let runner = Recorder::default();
    let mut out = Vec::new();

    let outcome = xable(
        Action::Enable,
        &tokens(&["ingress", "dns", "storage:fast"]),
        &registry,
        &names(&["dns"]),
        &runner,
        &mut out,
    )
    .expect("xable");

    assert_eq!(
        runner.script_names(),
        vec!["enable.ingress.sh", "enable.storage.sh"]
    );
    assert_eq!(runner.calls.borrow()[1].1, vec!["fast".to_string()]);
    assert_eq!(outcome.skipped, vec!["dns".to_string()]);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Addon dns is already enabled.\n"
    );
    assert_eq!(outcome.exit_code(), 0);
}

#[test]
fn xable_reports_first_failing_script() {
    let registry = ActionRegistry::with_scripts(
        Path::new("/actions"),
        [(Action::Disable, "dns"), (Action::Disable, "storage")],
    );
    let mut runner = Recorder::default();
    runner.codes.insert("disable.dns.sh".to_string(), 4);
    runner.codes.insert("disable.storage.sh".to_string(), 9);
    let mut out = Vec::new();

    let outcome = xable(
        Action::Disable,
        &tokens(&["dns", "storage"]),
        &registry,
        &BTreeSet::new(),
        &runner,
        &mut out,
    )
    .expect("xable");

    assert_eq!(runner.calls.borrow().len(), 2);
    assert_eq!(outcome.exit_code(), 4);
}

#[test]
fn catalog_state_drives_idempotency_sets() {
    let catalog = AddonCatalog::from_yaml_str(CATALOG, Path::new("addon-lists.yaml")).unwrap();
    let arm = catalog.available("arm64");
    assert_eq!(
        arm.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
        vec!["dns", "storage"]
    );

    let listing = "NAMESPACE NAME\nkube-system pod/coredns-588fd544bf-2x7kq 1/1 Running\n";
    let enabled = enabled_in_listing(listing, &arm);
    assert_eq!(enabled, names(&["dns"]));
    assert_eq!(target_state_set(Action::Enable, &arm, &enabled), names(&["dns"]));
    assert_eq!(
        target_state_set(Action::Disable, &arm, &enabled),
        names(&["storage"])
    );
}

struct FlakyProbe {
    calls: Cell<usize>,
    ready_after: usize,
}

impl ReadinessProbe for FlakyProbe {
    fn services(&self) -> Result<String, ExecError> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        if n == 1 {
            return Err(ExecError::Failed {
                program: "kubectl".to_string(),
                code: Some(1),
                stderr: "connection refused".to_string(),
            });
        }
        if n > self.ready_after {
            Ok("default service/kubernetes ClusterIP".to_string())
        } else {
            Ok(String::new())
        }
    }

    fn nodes(&self) -> Result<String, ExecError> {
        Ok("node-1 Ready <none> 1m v1.29".to_string())
    }
}

#[test]
fn poller_survives_probe_errors_until_ready() {
    let probe = FlakyProbe {
        calls: Cell::new(0),
        ready_after: 3,
    };
    let config = ReadinessConfig {
        retry_delay_ms: 1,
        ..ReadinessConfig::default()
    };
    let poller = ReadinessPoller::new(&probe, &config);
    assert!(poller.wait_for_ready(0));
    assert_eq!(probe.calls.get(), 4);
}

#[test]
fn poller_times_out_when_never_ready() {
    let probe = FlakyProbe {
        calls: Cell::new(0),
        ready_after: usize::MAX,
    };
    let config = ReadinessConfig {
        retry_delay_ms: 1,
        ..ReadinessConfig::default()
    };
    let poller = ReadinessPoller::new(&probe, &config);
    let start = Instant::now();
    assert!(!poller.wait_for_ready(1));
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[test]
fn config_overrides_snap_paths() {
    let tmp = tempdir().expect("tempdir");
    let snap = SnapEnv::new(tmp.path().join("snap"), tmp.path().join("data"));
    let args = tmp.path().join("data/args");
    fs::create_dir_all(&args).expect("mkdir");
    fs::write(
        args.join("wrappers.toml"),
        "arch = \"arm64\"\n\n[paths]\nactions_dir = \"/opt/actions\"\n\n[readiness]\nretry_delay_ms = 50\n",
    )
    .expect("write config");

    let config = Config::load(None, &snap).expect("load");
    assert_eq!(config.arch.as_deref(), Some("arm64"));
    assert_eq!(config.actions_dir(&snap), PathBuf::from("/opt/actions"));
    assert_eq!(config.catalog_path(&snap), snap.addon_catalog());
    assert_eq!(config.readiness.retry_delay(), Duration::from_millis(50));
    assert_eq!(config.readiness.core_service, "service/kubernetes");
}
