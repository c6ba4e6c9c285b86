use anyhow::Result;
use manip::app::{build_env, load_config, run_episodes, RunOptions};
use manip::policy::{Phase, ScriptedPolicy};
use scene::{assemble, Frame, Pose, Quat, Vec3};
use tasks::Preset;

fn options(episodes: usize, json: bool) -> RunOptions {
    RunOptions {
        episodes,
        max_steps: None,
        json,
    }
}

#[test]
fn scripted_policy_solves_every_preset() -> Result<()> {
    for preset in Preset::ALL {
        let mut env = build_env(load_config(preset, None)?, 21)?;
        let summary = run_episodes(&mut env, &options(10, false), &mut Vec::new())?;
        assert_eq!(summary.reports.len(), 10);
        assert_eq!(summary.success_rate(), 1.0, "{preset}: {summary:?}");
        for report in &summary.reports {
            assert!(report.steps < 200, "{preset}: {report:?}");
        }
    }
    Ok(())
}

#[test]
fn json_mode_writes_one_record_per_step() -> Result<()> {
    let preset = Preset::ReachWall;
    let mut env = build_env(preset.config(), 4)?;
    let mut out = Vec::new();
    let summary = run_episodes(&mut env, &options(2, true), &mut out)?;

    let text = String::from_utf8(out)?;
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    let total_steps: usize = summary.reports.iter().map(|r| r.steps).sum();
    assert_eq!(records.len(), total_steps);

    let last = records.last().expect("at least one step");
    assert_eq!(last["episode"], 1);
    assert_eq!(last["info"]["success"], 1.0);
    for key in tasks::Info::KEYS {
        assert!(last["info"].get(key).is_some(), "missing {key}");
    }
    Ok(())
}

#[test]
fn step_cap_limits_episodes() -> Result<()> {
    let preset = Preset::Basketball;
    let mut env = build_env(preset.config(), 1)?;
    let options = RunOptions {
        episodes: 3,
        max_steps: Some(5),
        json: false,
    };
    let summary = run_episodes(&mut env, &options, &mut Vec::new())?;
    assert!(summary.reports.iter().all(|r| r.steps == 5 && !r.success));
    assert_eq!(summary.success_rate(), 0.0);
    Ok(())
}

#[test]
fn missing_config_file_is_an_error() {
    let err = load_config(Preset::ReachWall, Some("no/such/task.json".as_ref())).unwrap_err();
    assert!(err.to_string().contains("no/such/task.json"));
}

#[test]
fn policy_walks_through_grasp_phases() -> Result<()> {
    let config = Preset::Basketball.config();
    let mut policy = ScriptedPolicy::new(&config);
    let object = Vec3::new(0.0, 0.6, 0.03);
    let goal = Vec3::new(0.0, 0.8, 0.25);
    let obs = |tcp: Vec3| {
        let frame = Frame {
            tcp,
            gripper_open: 1.0,
            object: Pose::new(object, Quat::IDENTITY),
        };
        assemble(&frame, &frame, goal)
    };

    let action = policy.act(&obs(Vec3::new(0.0, 0.6, 0.155)))?;
    assert_eq!(policy.phase(), Phase::Approach);
    assert_eq!(action.grip, -1.0);
    assert_eq!(action.delta.z, -1.0);

    policy.act(&obs(Vec3::new(0.0, 0.6, 0.11)))?;
    assert_eq!(policy.phase(), Phase::Descend);

    let action = policy.act(&obs(Vec3::new(0.0, 0.6, 0.03)))?;
    assert_eq!(policy.phase(), Phase::Grasp);
    assert_eq!(action.grip, 1.0);
    assert_eq!(action.delta, Vec3::ZERO);
    policy.act(&obs(Vec3::new(0.0, 0.6, 0.03)))?;
    policy.act(&obs(Vec3::new(0.0, 0.6, 0.03)))?;

    let action = policy.act(&obs(Vec3::new(0.0, 0.6, 0.03)))?;
    assert_eq!(policy.phase(), Phase::Carry);
    assert_eq!(action.grip, 1.0);
    assert_eq!(action.delta.y, 1.0);

    policy.reset();
    assert_eq!(policy.phase(), Phase::Approach);
    assert!(policy.act(&[0.0; 5]).is_err());
    Ok(())
}
