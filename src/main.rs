use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};

use optikit::cli::{
    build_release, clean_flutter, clean_ios, handle_generate_command, handle_rollback,
    handle_version_command, init_project, list_devices, open_android, open_ios, run_app,
    run_select, setup_vscode, update_version, BuildTarget, GenerateCommands, IosCleanOptions,
    RunOptions, VersionCommands,
};
use optikit::config::{paths::home_dir, Context, ProjectPaths, Settings};
use optikit::display::logger;
use optikit::shell::RetryPolicy;
use optikit::OptikitError;

#[derive(Parser)]
#[command(
    name = "optikit",
    version,
    about = "Command-line helper for Flutter projects",
    long_about = "OptiKit wraps the Flutter, FVM and CocoaPods tooling behind a few \
                  commands: cleaning, release builds, version bumps, module \
                  scaffolding and rollback of files it has backed up."
)]
struct Cli {
    /// Show what would be done without changing anything
    #[arg(long, global = true)]
    dry_run: bool,

    /// Print executed commands and other diagnostics
    #[arg(short, long, global = true, env = "OPTIKIT_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate project scaffolding
    #[command(subcommand)]
    Generate(GenerateCommands),

    /// Clean the Flutter project
    CleanFlutter {
        /// Run without FVM
        #[arg(long)]
        disable_fvm: bool,
    },

    /// Clean the iOS project
    CleanIos {
        /// Also clean the CocoaPods cache
        #[arg(long)]
        clean_cache: bool,
        /// Update the pod repositories and pods instead of a plain install
        #[arg(long)]
        repo_update: bool,
        /// Run without FVM
        #[arg(long)]
        disable_fvm: bool,
    },

    /// Build the APK with release configuration, obfuscation and split debug info
    FlutterBuildApk {
        #[arg(long)]
        disable_fvm: bool,
    },

    /// Build the App Bundle with release configuration, obfuscation and split debug info
    FlutterBuildBundle {
        #[arg(long)]
        disable_fvm: bool,
    },

    /// Build the iOS app with release configuration
    FlutterBuildIos {
        #[arg(long)]
        disable_fvm: bool,
    },

    /// Create a release IPA
    FlutterBuildIpa {
        #[arg(long)]
        disable_fvm: bool,
    },

    /// Update version and build numbers for Android and iOS
    FlutterUpdateVersion {
        /// Version to set on both platforms (X.Y.Z)
        #[arg(long, default_value = "")]
        app_version: String,
        /// Android build number written to pubspec.yaml; empty skips Android
        #[arg(long, default_value = "")]
        android_build: String,
        /// iOS build number written to the Xcode project; empty skips iOS
        #[arg(long, default_value = "")]
        ios_build: String,
    },

    /// Open the iOS project in Xcode
    OpenIos,

    /// Open the Android project in Android Studio
    OpenAndroid,

    /// Create .vscode/settings.json with recommended Flutter settings
    SetupVscode,

    /// Initialize OptiKit configuration in the current project
    Init,

    /// List backups, or restore one by index
    Rollback {
        /// Index shown by the listing
        #[arg(long)]
        restore: Option<usize>,
    },

    /// Show or bump the project version
    Version {
        #[command(subcommand)]
        command: Option<VersionCommands>,
    },

    /// List connected devices
    Devices {
        #[arg(long)]
        disable_fvm: bool,
    },

    /// Run the app on a connected device
    Run {
        /// Device ID to run on
        #[arg(short, long)]
        device: Option<String>,
        /// Run in release mode
        #[arg(short, long)]
        release: bool,
        /// Build flavor to use
        #[arg(short, long)]
        flavor: Option<String>,
        #[arg(long)]
        disable_fvm: bool,
    },

    /// Pick a device interactively and run on it
    RunSelect {
        #[arg(short, long)]
        release: bool,
        #[arg(short, long)]
        flavor: Option<String>,
        #[arg(long)]
        disable_fvm: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        match e.downcast_ref::<OptikitError>() {
            Some(err) => {
                logger::error(err.to_string());
                if let Some(hint) = err.hint() {
                    logger::hint(hint);
                }
            }
            None => logger::error(format!("{:#}", e)),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = ProjectPaths::from_current_dir()?;
    let settings = Settings::load(&paths, home_dir().as_deref());
    let ctx = Context::new(paths, settings, cli.dry_run, cli.verbose);

    ctx.dry_run().announce();
    let executor = ctx.executor();

    match cli.command {
        Commands::Generate(cmd) => handle_generate_command(&ctx, cmd)?,
        Commands::CleanFlutter { disable_fvm } => clean_flutter(&ctx, &executor, disable_fvm)?,
        Commands::CleanIos {
            clean_cache,
            repo_update,
            disable_fvm,
        } => {
            let options = IosCleanOptions {
                clean_cache,
                repo_update,
                disable_fvm,
                retry: RetryPolicy::default(),
            };
            clean_ios(&ctx, &ctx.ios_executor(), options)?
        }
        Commands::FlutterBuildApk { disable_fvm } => {
            build_release(&ctx, &executor, BuildTarget::Apk, disable_fvm)?
        }
        Commands::FlutterBuildBundle { disable_fvm } => {
            build_release(&ctx, &executor, BuildTarget::Bundle, disable_fvm)?
        }
        Commands::FlutterBuildIos { disable_fvm } => {
            build_release(&ctx, &executor, BuildTarget::Ios, disable_fvm)?
        }
        Commands::FlutterBuildIpa { disable_fvm } => {
            build_release(&ctx, &executor, BuildTarget::Ipa, disable_fvm)?
        }
        Commands::FlutterUpdateVersion {
            app_version,
            android_build,
            ios_build,
        } => update_version(&ctx, &app_version, &android_build, &ios_build)?,
        Commands::OpenIos => open_ios(&ctx, &executor)?,
        Commands::OpenAndroid => open_android(&ctx, &executor)?,
        Commands::SetupVscode => {
            setup_vscode(&ctx)?;
        }
        Commands::Init => {
            init_project(&ctx)?;
        }
        Commands::Rollback { restore } => handle_rollback(&ctx, restore)?,
        Commands::Version { command } => handle_version_command(&ctx, command)?,
        Commands::Devices { disable_fvm } => {
            list_devices(&ctx, &executor, disable_fvm)?;
        }
        Commands::Run {
            device,
            release,
            flavor,
            disable_fvm,
        } => {
            let options = RunOptions {
                device,
                release,
                flavor,
                disable_fvm,
            };
            run_app(&ctx, &executor, &options)?
        }
        Commands::RunSelect {
            release,
            flavor,
            disable_fvm,
        } => {
            let options = RunOptions {
                device: None,
                release,
                flavor,
                disable_fvm,
            };
            run_select(&ctx, &executor, &options, &mut io::stdin().lock())?;
        }
    }

    ctx.dry_run().print_summary();
    Ok(())
}
