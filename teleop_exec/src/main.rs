//! Main teleoperation executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules and the equipment
//!     - Start a producer thread, publishing operator snapshots from a script or stdin
//!     - Main loop, at the rate set by mode control:
//!         - Read the latest snapshot
//!         - Mode, pan-tilt, base, arm preset, waist, gripper and end-effector processing
//!         - Archiving
//!
//! # Usage
//!
//! `teleop_exec` with no arguments reads one JSON snapshot per line from stdin, while
//! `teleop_exec <script>` replays a TC script.
//!
//! # Modules
//!
//! All modules (e.g. `mode_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait, or a pair of
//!        `init`/`proc_*` functions where the module needs the equipment itself.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info};
use std::env;
use std::time::Duration;

// Internal
use teleop_lib::{
    arm_ctrl::{self, ArmCtrl},
    cmd_store::CmdStore,
    data_store::DataStore,
    eqpt::Eqpt,
    gripper_ctrl, mode_ctrl, pan_tilt_ctrl,
    params::TeleopExecParams,
    producer,
    scheduler::Scheduler,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::ScriptInterpreter,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Modules logged at a different level to the rest of the executable.
const LOG_MODULE_LEVELS: &[(&str, LevelFilter)] = &[("teleop_lib::sim_client", LevelFilter::Trace)];

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("teleop_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, LOG_MODULE_LEVELS, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Teleoperation Executable\n");
    info!("Running on: {}", host::get_platform());
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: TeleopExecParams =
        util::params::load("teleop_exec.toml").wrap_err("Could not load exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE TC SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let script = match args.len() {
        1 => {
            info!("No script provided, snapshots will be read from stdin\n");
            None
        }
        2 => {
            info!("Loading script from \"{}\"", &args[1]);

            let si = ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} TCs\n",
                si.get_duration(),
                si.get_num_tcs()
            );

            Some(si)
        }
        n => {
            return Err(eyre!(
                "Expected either zero or one argument, found {}",
                n - 1
            ))
        }
    };

    // ---- INITIALISE EQUIPMENT ----

    let mut eqpt = init_eqpt(&exec_params)?;
    info!(
        "Equipment initialised (arm: {}, gripper: {}, base: {})",
        eqpt.arm.is_some(),
        eqpt.gripper.is_some(),
        eqpt.base.is_some()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();
    ds.use_base = exec_params.use_base;

    let mode_params: mode_ctrl::Params =
        util::params::load("mode_ctrl.toml").wrap_err("Could not load ModeCtrl params")?;
    ds.mode_ctrl
        .init(mode_params)
        .wrap_err("Failed to initialise ModeCtrl")?;
    info!("ModeCtrl init complete");

    let pan_tilt_params: pan_tilt_ctrl::Params = util::params::load("pan_tilt_ctrl.toml")
        .wrap_err("Could not load PanTiltCtrl params")?;
    ds.pan_tilt_ctrl
        .init(pan_tilt_params)
        .wrap_err("Failed to initialise PanTiltCtrl")?;
    info!("PanTiltCtrl init complete");

    let gripper_params: gripper_ctrl::Params = util::params::load("gripper_ctrl.toml")
        .wrap_err("Could not load GripperCtrl params")?;
    ds.gripper_ctrl
        .init(gripper_params)
        .wrap_err("Failed to initialise GripperCtrl")?;
    if let Some(ref mut gripper) = eqpt.gripper {
        gripper.set_pressure(ds.gripper_ctrl.pressure());
    }
    info!("GripperCtrl init complete");

    if let Some(ref arm) = eqpt.arm {
        let arm_params: arm_ctrl::Params =
            util::params::load("arm_ctrl.toml").wrap_err("Could not load ArmCtrl params")?;
        let mut ac = ArmCtrl::init(arm_params, arm.as_ref())
            .wrap_err("Failed to initialise ArmCtrl")?;

        if exec_params.archive_tracked_frame {
            ac.enable_archive(&session)
                .wrap_err("Failed to initialise the ArmCtrl archive")?;
        }

        ds.arm_ctrl = Some(ac);
        info!("ArmCtrl init complete");
    }

    info!("Module initialisation complete\n");

    // ---- START PRODUCER ----

    let cmd_store = CmdStore::new();
    let scheduler = Scheduler::new(ds.mode_ctrl.shared_rate());

    let producer = match script {
        Some(si) => producer::spawn_script_producer(
            si,
            cmd_store.publisher(),
            scheduler.stop_handle(),
            Duration::from_secs_f64(exec_params.script_end_linger_s.max(0.0)),
        ),
        None => producer::spawn_stdin_producer(cmd_store.publisher(), scheduler.stop_handle()),
    }
    .wrap_err("Failed to start the TC producer")?;

    // ---- MAIN LOOP ----

    scheduler.run(&cmd_store, &mut ds, &mut eqpt);

    // The stdin producer may be blocked on a read, so only wait for script producers
    if producer.is_finished() {
        producer
            .join()
            .map_err(|_| eyre!("The TC producer panicked"))?;
    }

    info!("End of execution");

    Ok(())
}

/// Build the equipment used by this execution.
#[cfg(feature = "sim")]
fn init_eqpt(exec_params: &TeleopExecParams) -> Result<Eqpt, Report> {
    use teleop_lib::sim_client::{self, SimParams};

    let sim_params: SimParams =
        util::params::load("sim_eqpt.toml").wrap_err("Could not load simulated equipment params")?;

    sim_client::build_eqpt(&sim_params, exec_params.use_arm, exec_params.use_base)
        .wrap_err("Failed to initialise the simulated equipment")
}

#[cfg(not(feature = "sim"))]
fn init_eqpt(_exec_params: &TeleopExecParams) -> Result<Eqpt, Report> {
    Err(eyre!(
        "No equipment clients are available, build with the \"sim\" feature"
    ))
}
