//! Tests for command construction.

use super::*;
use crate::exit_codes;
use crate::test_support::{FakeEntryPoints, resolution, strings};

fn launch_spec(mode: Mode, devices: &[&str], hosts: &[&str]) -> LaunchSpec {
    LaunchSpec::new(
        "lstm",
        resolution(mode, devices, hosts),
        None,
        None,
        "logs/lstm/20260101-000000",
    )
}

fn workers_only() -> FakeEntryPoints {
    FakeEntryPoints::new(&["lstm_worker.py"])
}

#[test]
fn missing_worker_entry_point_is_a_configuration_error() {
    let entries = FakeEntryPoints::new(&[]);
    let err = build(
        &launch_spec(Mode::Single, &[], &[]),
        &LauncherConfig::default(),
        &EnvSnapshot::default(),
        &entries,
    )
    .unwrap_err();

    assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
    assert!(err.to_string().contains("lstm_worker.py"));
}

#[test]
fn single_node_plan_lists_devices_in_order() {
    let plan = build(
        &launch_spec(Mode::Single, &["cuda0", "cuda3"], &[]),
        &LauncherConfig::default(),
        &EnvSnapshot::default(),
        &workers_only(),
    )
    .unwrap();

    assert_eq!(plan.program, "python3");
    assert_eq!(
        plan.args,
        strings(&[
            "controller.py",
            "lstm",
            "logs/lstm/20260101-000000",
            "--single",
            "--devices",
            "cuda0",
            "cuda3",
        ])
    );
    assert!(plan.env_overlay.is_empty());
}

#[test]
fn single_node_plan_without_devices_has_no_device_flag() {
    let plan = build(
        &launch_spec(Mode::Single, &[], &[]),
        &LauncherConfig::default(),
        &EnvSnapshot::default(),
        &workers_only(),
    )
    .unwrap();

    assert!(plan.args.contains(&"--single".to_string()));
    assert!(!plan.args.contains(&DEVICES_FLAG.to_string()));
}

#[test]
fn specialized_controller_is_preferred() {
    let entries = FakeEntryPoints::new(&["lstm_worker.py", "lstm_controller.py"]);
    let plan = build(
        &launch_spec(Mode::Single, &[], &[]),
        &LauncherConfig::default(),
        &EnvSnapshot::default(),
        &entries,
    )
    .unwrap();

    assert_eq!(plan.args[0], "lstm_controller.py");
}

#[test]
fn multi_node_plan_runs_one_process_per_host() {
    let env: EnvSnapshot = [
        ("PATH", "/usr/bin"),
        ("CUDA_VISIBLE_DEVICES", "0,1"),
        ("BASH_FUNC_module%%", "() { :; }"),
    ]
    .into_iter()
    .collect();

    let plan = build(
        &launch_spec(Mode::Multi, &[], &["nodeA", "nodeB"]),
        &LauncherConfig::default(),
        &env,
        &workers_only(),
    )
    .unwrap();

    assert_eq!(plan.program, "mpirun");
    assert_eq!(
        plan.args,
        strings(&[
            "-np",
            "2",
            "--npernode",
            "1",
            "--host",
            "nodeA,nodeB",
            "--output-filename",
            "logs/lstm/20260101-000000/mpi",
            "--mca",
            "mpi_warn_on_fork",
            "0",
            "-x",
            "PATH",
            "python3",
            "controller.py",
            "lstm",
            "logs/lstm/20260101-000000",
            "--multi",
        ])
    );
}

#[test]
fn multi_node_plan_blanks_device_variable_for_wrapper() {
    let plan = build(
        &launch_spec(Mode::Multi, &[], &["nodeA", "nodeB", "nodeC"]),
        &LauncherConfig::default(),
        &EnvSnapshot::default(),
        &workers_only(),
    )
    .unwrap();

    assert_eq!(plan.env_overlay.len(), 1);
    assert_eq!(
        plan.env_overlay.get("CUDA_VISIBLE_DEVICES").map(String::as_str),
        Some("")
    );
    assert_eq!(plan.args[1], "3");
}

#[test]
fn device_variable_name_comes_from_config() {
    let config = LauncherConfig {
        device_env_var: "HIP_VISIBLE_DEVICES".to_string(),
        ..LauncherConfig::default()
    };
    let env: EnvSnapshot = [("CUDA_VISIBLE_DEVICES", "0"), ("HIP_VISIBLE_DEVICES", "1")]
        .into_iter()
        .collect();

    let plan = build(
        &launch_spec(Mode::Multi, &[], &["a", "b"]),
        &config,
        &env,
        &workers_only(),
    )
    .unwrap();

    assert!(plan.env_overlay.contains_key("HIP_VISIBLE_DEVICES"));
    assert!(plan.args.contains(&"CUDA_VISIBLE_DEVICES".to_string()));
    assert!(!plan.args.contains(&"HIP_VISIBLE_DEVICES".to_string()));
}

#[test]
fn worker_args_become_one_re_splittable_token() {
    let mut launch = launch_spec(Mode::Single, &[], &[]);
    launch.worker_args = Some("lr=0.1 momentum=0.9".to_string());

    let plan = build(
        &launch,
        &LauncherConfig::default(),
        &EnvSnapshot::default(),
        &workers_only(),
    )
    .unwrap();

    let flag_at = plan
        .args
        .iter()
        .position(|a| a == WORKER_ARGS_FLAG)
        .unwrap();
    assert_eq!(flag_at, plan.args.len() - 2);

    let token = &plan.args[flag_at + 1];
    assert_eq!(
        shell_words::split(token).unwrap(),
        strings(&["lr=0.1", "momentum=0.9"])
    );
}

#[test]
fn quoted_sub_arguments_survive_tokenization() {
    let mut launch = launch_spec(Mode::Multi, &[], &["a", "b"]);
    launch.controller_args = Some("--epochs 3 --note 'two words'".to_string());
    launch.worker_args = Some("--tag \"x y\" z".to_string());

    let plan = build(
        &launch,
        &LauncherConfig::default(),
        &EnvSnapshot::default(),
        &workers_only(),
    )
    .unwrap();

    let tail = &plan.args[plan.args.len() - 6..];
    assert_eq!(
        &tail[..4],
        &strings(&["--epochs", "3", "--note", "two words"])[..]
    );
    assert_eq!(tail[4], WORKER_ARGS_FLAG);
    assert_eq!(
        shell_words::split(&tail[5]).unwrap(),
        strings(&["--tag", "x y", "z"])
    );
}

#[test]
fn unbalanced_quotes_are_a_configuration_error() {
    let mut launch = launch_spec(Mode::Single, &[], &[]);
    launch.controller_args = Some("--note 'oops".to_string());

    let err = build(
        &launch,
        &LauncherConfig::default(),
        &EnvSnapshot::default(),
        &workers_only(),
    )
    .unwrap_err();

    assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
    assert!(err.to_string().contains("--controller-args"));
}

#[test]
fn building_is_deterministic() {
    let env: EnvSnapshot = [("B", "2"), ("A", "1")].into_iter().collect();
    let launch = launch_spec(Mode::Multi, &[], &["a", "b"]);
    let config = LauncherConfig::default();

    let first = build(&launch, &config, &env, &workers_only()).unwrap();
    let second = build(&launch, &config, &env, &workers_only()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn command_line_quotes_arguments() {
    let plan = CommandPlan {
        program: "python3".to_string(),
        args: strings(&["controller.py", "two words"]),
        env_overlay: BTreeMap::new(),
    };
    assert_eq!(plan.command_line(), "python3 controller.py 'two words'");
}
