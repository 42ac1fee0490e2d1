//! `devices`, `run` and `run-select`

use std::io::{self, BufRead, Write};

use colored::*;
use serde::Deserialize;

use crate::config::Context;
use crate::display::logger;
use crate::error::{OptikitError, OptikitResult};
use crate::shell::{flutter_command, CommandRunner};
use crate::validation::{validate_flutter_project, validate_flutter_sdk};

/// A device reported by `flutter devices --machine`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "targetPlatform", alias = "platform", default)]
    pub platform: String,
    #[serde(rename = "emulator", default)]
    pub is_emulator: bool,
}

/// Options shared by `run` and `run-select`
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub device: Option<String>,
    pub release: bool,
    pub flavor: Option<String>,
    pub disable_fvm: bool,
}

/// Parse the machine-readable device list; malformed output yields no devices
pub fn parse_devices(json: &str) -> Vec<Device> {
    serde_json::from_str(json).unwrap_or_default()
}

/// Query the connected devices
pub fn fetch_devices(runner: &dyn CommandRunner, use_fvm: bool) -> Vec<Device> {
    match runner.run_silent(&flutter_command("flutter devices --machine", use_fvm)) {
        Ok(output) => parse_devices(&output),
        Err(_) => Vec::new(),
    }
}

pub fn list_devices(ctx: &Context, runner: &dyn CommandRunner, disable_fvm: bool) -> OptikitResult<Vec<Device>> {
    let use_fvm = ctx.use_fvm(disable_fvm);
    validate_flutter_project(ctx.paths())?;
    validate_flutter_sdk(ctx.paths(), runner, use_fvm)?;

    logger::info("Fetching connected devices...");
    let devices = fetch_devices(runner, use_fvm);

    if devices.is_empty() {
        logger::warning("No devices found.");
        println!("{}", "\nMake sure you have:".dimmed());
        println!("{}", "  - A device connected via USB".dimmed());
        println!("{}", "  - An emulator/simulator running".dimmed());
        println!("{}", "  - Chrome browser for web development\n".dimmed());
        return Ok(devices);
    }

    print_devices(&devices, true);

    let rule = "=".repeat(60);
    println!("{}", rule.dimmed());
    println!("{}", "To run on a specific device:".dimmed());
    println!("  optikit run --device <device-id>");
    println!("{}", "\nOr use interactive selection:".dimmed());
    println!("  optikit run-select");
    println!("{}\n", rule.dimmed());

    Ok(devices)
}

/// `flutter run` command line for `options`
pub fn run_command(options: &RunOptions, use_fvm: bool) -> String {
    let mut command = flutter_command("flutter run", use_fvm);
    if let Some(device) = &options.device {
        command.push_str(&format!(" --device-id {}", device));
    }
    if options.release {
        command.push_str(" --release");
    }
    if let Some(flavor) = &options.flavor {
        command.push_str(&format!(" --flavor {}", flavor));
    }
    command
}

pub fn run_app(ctx: &Context, runner: &dyn CommandRunner, options: &RunOptions) -> OptikitResult<()> {
    let use_fvm = ctx.use_fvm(options.disable_fvm);
    validate_flutter_project(ctx.paths())?;
    validate_flutter_sdk(ctx.paths(), runner, use_fvm)?;

    launch(runner, options, use_fvm)
}

/// Let the user pick a device from `input`, then run on it
pub fn run_select(
    ctx: &Context,
    runner: &dyn CommandRunner,
    options: &RunOptions,
    input: &mut dyn BufRead,
) -> OptikitResult<Device> {
    let use_fvm = ctx.use_fvm(options.disable_fvm);
    validate_flutter_project(ctx.paths())?;
    validate_flutter_sdk(ctx.paths(), runner, use_fvm)?;

    logger::info("Fetching connected devices...");
    let devices = fetch_devices(runner, use_fvm);
    if devices.is_empty() {
        return Err(OptikitError::precondition_only(
            "No devices found. Please connect a device or start an emulator.",
        ));
    }

    print_devices(&devices, false);
    println!("{}", "=".repeat(60).dimmed());
    println!("{}", "Enter device number to run on:".cyan());
    print!("{}", "Device number: ".yellow());
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let device = select_device(&devices, &answer)?.clone();

    println!("{}", format!("\nSelected: {}\n", device.name).green());

    let options = RunOptions {
        device: Some(device.id.clone()),
        ..options.clone()
    };
    launch(runner, &options, use_fvm)?;
    Ok(device)
}

/// Resolve a 1-based answer against `devices`
pub fn select_device<'a>(devices: &'a [Device], answer: &str) -> OptikitResult<&'a Device> {
    let max = devices.len();
    let index: usize = answer.trim().parse().map_err(|_| {
        OptikitError::Validation(format!(
            "Invalid device number. Please choose between 1 and {}",
            max
        ))
    })?;

    if index == 0 || index > max {
        return Err(OptikitError::InvalidIndex {
            listing: "device",
            index,
            max,
        });
    }
    Ok(&devices[index - 1])
}

fn launch(runner: &dyn CommandRunner, options: &RunOptions, use_fvm: bool) -> OptikitResult<()> {
    match &options.device {
        Some(device) => logger::info(format!("Running on device: {}", device)),
        None => logger::info("Running on default device..."),
    }
    if options.release {
        logger::info("Running in release mode");
    }
    if let Some(flavor) = &options.flavor {
        logger::info(format!("Running with flavor: {}", flavor));
    }

    let command = run_command(options, use_fvm);
    println!("{}", "\nStarting Flutter app...".cyan());
    println!("{}", format!("Command: {}\n", command).dimmed());

    runner.run_attached(&command)
}

fn print_devices(devices: &[Device], with_ids: bool) {
    logger::heading("Connected Devices:");
    println!();

    for (i, device) in devices.iter().enumerate() {
        let kind = if device.is_emulator {
            " [Emulator]".yellow()
        } else {
            " [Physical]".green()
        };
        println!(
            "{} {} {}{}",
            format!("[{}]", i + 1).cyan(),
            device.name.bold(),
            format!("({})", device.platform).dimmed(),
            kind
        );
        if with_ids {
            println!("    {}\n", format!("ID: {}", device.id).dimmed());
        }
    }
}
