use anyhow::{Result, bail};
use clap::Parser;
use rooms::{ConnectionPolicy, RoomRole, WorldConfig, generate_rooms};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    runs: u64,
    /// Count only new edges towards the minimum degree
    #[arg(long)]
    distinct: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let policy =
        if args.distinct { ConnectionPolicy::CountDistinct } else { ConnectionPolicy::CountAttempts };
    let config = WorldConfig { policy, ..WorldConfig::default() };

    println!("Generating {} room sets from seed {} with {:?}...", args.runs, args.seed, policy);

    let mut rooms_below_minimum = 0_u64;
    let mut sets_below_minimum = 0_u64;
    let mut degree_histogram = vec![0_u64; config.room_count];

    for run in 0..args.runs {
        let seed = args.seed.wrapping_add(run);
        let generated = generate_rooms(&config, seed)?;
        let rooms = &generated.rooms;

        // Assert invariants
        let starts = rooms.iter().filter(|(_, room)| room.role == RoomRole::Start).count();
        let ends = rooms.iter().filter(|(_, room)| room.role == RoomRole::End).count();
        if starts != 1 || ends != 1 {
            bail!("seed {seed}: {starts} start rooms and {ends} end rooms");
        }
        for (id, room) in rooms.iter() {
            if room.connections.iter().any(|&other| !rooms.room(other).is_connected_to(id)) {
                bail!("seed {seed}: connections of '{}' are not symmetric", room.name);
            }
            if room.degree() > config.max_connections {
                bail!("seed {seed}: '{}' has {} connections", room.name, room.degree());
            }
        }
        if policy == ConnectionPolicy::CountAttempts
            && generated.attempts.iter().any(|&count| count != config.min_connections)
        {
            bail!("seed {seed}: attempt counts {:?}", generated.attempts);
        }

        let short = rooms.iter().filter(|(_, room)| room.degree() < config.min_connections).count();
        rooms_below_minimum += short as u64;
        sets_below_minimum += u64::from(short > 0);
        for (_, room) in rooms.iter() {
            degree_histogram[room.degree()] += 1;
        }
    }

    println!("Sets with a room below {} connections: {}", config.min_connections, sets_below_minimum);
    println!("Rooms below {} connections: {}", config.min_connections, rooms_below_minimum);
    for (degree, count) in degree_histogram.iter().enumerate().filter(|(_, count)| **count > 0) {
        println!("  degree {degree}: {count}");
    }
    println!("Fuzzing completed successfully.");
    Ok(())
}
