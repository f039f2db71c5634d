use clap::{App, Arg, ArgMatches, SubCommand};
use spnbot::{
    config::{DEFAULT_SHM_PATH, DEFAULT_SOCKET_PATH},
    layout::{LAYOUT, LOG_MAX_BYTES, LOG_OFFSET, SHARED_MEMORY_BYTES},
    Bot, BotApi, ClientConfig, Color, Result, SharedMemoryRegion, StepDecision,
};
use std::sync::Arc;

/// Records shown per array by `inspect`
const INSPECT_ROWS: usize = 5;

fn main() -> Result<()> {
    env_logger::init();

    let matches = App::new("spnbot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("SPN snake game bot client")
        .subcommand(
            SubCommand::with_name("run")
                .about("Connect to the game server and run the demo bot")
                .arg(
                    Arg::with_name("shm")
                        .long("shm")
                        .value_name("FILE")
                        .help("Shared memory file published by the server")
                        .default_value(DEFAULT_SHM_PATH)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("socket")
                        .long("socket")
                        .value_name("SOCKET")
                        .help("Control socket of the server")
                        .default_value(DEFAULT_SOCKET_PATH)
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("inspect")
                .about("Dump the current contents of a shared memory file")
                .arg(
                    Arg::with_name("shm_file")
                        .value_name("SHM_FILE")
                        .help("Shared memory file")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(SubCommand::with_name("layout").about("Print the shared memory layout"))
        .get_matches();

    match matches.subcommand() {
        ("run", Some(run_matches)) => handle_run(run_matches),
        ("inspect", Some(inspect_matches)) => handle_inspect(inspect_matches),
        ("layout", Some(_)) => {
            show_layout();
            Ok(())
        }
        _ => {
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

fn handle_run(matches: &ArgMatches) -> Result<()> {
    let config = ClientConfig::default()
        .with_shm_path(matches.value_of("shm").unwrap_or(DEFAULT_SHM_PATH))
        .with_socket_path(matches.value_of("socket").unwrap_or(DEFAULT_SOCKET_PATH));

    let stats = spnbot::run(&config, DemoBot::default())?;
    println!(
        "Server closed the connection after {} commands ({} steps, {} faults)",
        stats.commands, stats.step_calls, stats.faults
    );
    Ok(())
}

fn handle_inspect(matches: &ArgMatches) -> Result<()> {
    let path = matches.value_of("shm_file").unwrap_or(DEFAULT_SHM_PATH);
    let region = Arc::new(SharedMemoryRegion::open(path)?);
    let api = BotApi::new(Arc::clone(&region))?;

    let shown = region.path().map(|p| p.display().to_string()).unwrap_or_else(|| path.to_string());
    println!("Region {} ({} bytes)", shown, region.size());

    println!("\nServer config:");
    for (name, value) in api.server_config().fields().entries() {
        println!("  {:<32} {}", name, value);
    }

    println!("\nSelf info:");
    for (name, value) in api.self_info().fields().entries() {
        println!("  {:<32} {}", name, value);
    }

    println!("\nFood: {}", api.food().len());
    for food in api.food().iter().take(INSPECT_ROWS) {
        println!(
            "  ({:.1}, {:.1}) value {:.2} dir {:.3} dist {:.1}",
            food.x, food.y, food.val, food.dir, food.dist
        );
    }

    println!("\nBots: {}", api.bots().len());
    for bot in api.bots().iter().take(INSPECT_ROWS) {
        println!("  #{} {}", bot.bot_id, bot.bot_name);
    }

    println!("\nSegments: {}", api.segments().len());
    for segment in api.segments().iter().take(INSPECT_ROWS) {
        println!(
            "  ({:.1}, {:.1}) r {:.1} dist {:.1} bot #{}{}",
            segment.x,
            segment.y,
            segment.r,
            segment.dist,
            segment.bot_id,
            if segment.is_self { " (self)" } else { "" }
        );
    }

    println!("\nColors: {}", api.colors().len());

    let mut log = [0u8; LOG_MAX_BYTES];
    region.read_into(LOG_OFFSET, &mut log)?;
    let end = log.iter().position(|&b| b == 0).unwrap_or(LOG_MAX_BYTES);
    println!("\nLog: {:?}", String::from_utf8_lossy(&log[..end]));

    Ok(())
}

fn show_layout() {
    println!("{:<16} {:>10} {:>10}", "field", "offset", "size");
    for entry in LAYOUT.iter() {
        println!("{:<16} {:>10} {:>10}", entry.name, entry.offset, entry.size);
    }
    println!("{:<16} {:>10}", "total", SHARED_MEMORY_BYTES);
}

/// Circles slowly in green and reports close encounters
#[derive(Debug, Default)]
struct DemoBot {
    steps: u64,
}

impl DemoBot {
    const PATTERN: [Color; 4] = [
        Color::new(40, 255, 0),
        Color::new(20, 128, 0),
        Color::new(10, 64, 0),
        Color::new(20, 128, 0),
    ];

    const TURN: f32 = 0.001;

    const WARNING_DISTANCE: f32 = 20.0;
}

impl Bot for DemoBot {
    fn init(&mut self, api: &mut BotApi) -> Result<bool> {
        api.clear_colors();
        api.add_colors(Self::PATTERN);
        Ok(true)
    }

    fn step(&mut self, api: &mut BotApi) -> Result<StepDecision> {
        self.steps += 1;

        let threat = api
            .segments()
            .iter()
            .find(|segment| !segment.is_self && segment.dist < Self::WARNING_DISTANCE);
        if let Some(segment) = threat {
            api.log(format!(
                "step {}: bot #{} is {:.1} away",
                self.steps, segment.bot_id, segment.dist
            ));
        }

        Ok(StepDecision::steer(Self::TURN))
    }
}
