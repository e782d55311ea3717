use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use active_regions::{
    ActiveRegionConfig, ActiveRegionDetector, IndelBuffer, IndelKey, IndelObservation,
    IndelObservationData, Pos, ReferenceSegment, SampleId,
};

#[derive(Parser, Debug)]
#[command(name = "active-regions", about = "Streaming active-region detection over pileup evidence")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drive the detector with a synthetic pileup and report its decisions.
    Simulate {
        /// Start coordinate of each simulated pileup block (repeatable).
        #[arg(long = "start", default_values_t = vec![100, 7000])]
        starts: Vec<Pos>,
        /// Offsets within each block carrying an alternating SNV (repeatable).
        #[arg(long = "snv-offset", default_values_t = vec![10, 12])]
        snv_offsets: Vec<Pos>,
        /// Offset within each block carrying an insertion seen by every other read.
        #[arg(long)]
        indel_offset: Option<Pos>,
        /// Reads per block.
        #[arg(long, default_value_t = 50)]
        depth: u64,
        /// Bases covered by each read.
        #[arg(long, default_value_t = 100)]
        read_length: Pos,
        /// Largest indel considered and the clustering distance.
        #[arg(long, default_value_t = 50)]
        max_indel_size: u32,
        /// Minimum depth for the SNV test.
        #[arg(long, default_value_t = active_regions::detector::DEFAULT_MIN_DEPTH)]
        min_depth: u32,
        /// Alternate-base frequency that must be exceeded.
        #[arg(long, default_value_t = active_regions::detector::DEFAULT_MIN_ALT_FREQUENCY)]
        min_alt_frequency: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Simulate {
            starts,
            snv_offsets,
            indel_offset,
            depth,
            read_length,
            max_indel_size,
            min_depth,
            min_alt_frequency,
        } => {
            let config = ActiveRegionConfig::new(max_indel_size)
                .with_min_depth(min_depth)
                .with_min_alt_frequency(min_alt_frequency);
            let plan = SimulationPlan {
                starts,
                snv_offsets,
                indel_offset,
                depth,
                read_length,
            };
            run_simulation(&plan, config)?
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct SimulationPlan {
    starts: Vec<Pos>,
    snv_offsets: Vec<Pos>,
    indel_offset: Option<Pos>,
    depth: u64,
    read_length: Pos,
}

fn run_simulation(plan: &SimulationPlan, config: ActiveRegionConfig) -> Result<()> {
    if plan.read_length <= 0 {
        bail!("read length must be positive (got {})", plan.read_length);
    }
    let mut starts = plan.starts.clone();
    starts.sort_unstable();
    let contig_end = starts.last().copied().unwrap_or(0) + plan.read_length;
    if starts.first().is_some_and(|&start| start < 0) {
        bail!("block starts must be non-negative");
    }

    let reference = ReferenceSegment::new("chrSim", 0, vec![b'A'; contig_end as usize]);
    let mut store = IndelBuffer::new();
    let sample_id = store.register_sample("simulated");
    let retention = plan.read_length + Pos::from(config.max_indel_size);

    let mut polymorphic_sites = Vec::new();
    let mut regions = Vec::new();
    let mut indel_confirmations = Vec::new();
    {
        let mut detector = ActiveRegionDetector::new(&reference, &mut store, config)
            .context("failed to initialize active region detector")?;

        for (block_idx, &start) in starts.iter().enumerate() {
            let end = start + plan.read_length;
            info!(start, end, depth = plan.depth, "simulating pileup block");
            let indel_key = plan
                .indel_offset
                .map(|offset| IndelKey::insertion(start + offset, "AG"));

            feed_block(&mut detector, plan, sample_id, start, indel_key.as_ref())
                .with_context(|| format!("failed to insert observations for block at {start}"))?;

            let is_last_block = block_idx + 1 == starts.len();
            for pos in start..end {
                let is_last = is_last_block && pos + 1 == end;
                regions.extend(detector.update_end_position(pos, is_last)?);
                detector.update_start_position(pos - retention)?;
            }

            for pos in start..end {
                if detector.is_polymorphic_site(pos)? {
                    polymorphic_sites.push(pos);
                }
            }
            // candidates are pruned with the horizon, so read them per block
            if let Some(key) = indel_key {
                let confirmed = detector
                    .indel_store()
                    .is_confirmed(&key)
                    .with_context(|| format!("indel {key} missing from store"))?;
                indel_confirmations.push((key, confirmed));
            }
        }
    }

    println!("# polymorphic sites");
    for pos in &polymorphic_sites {
        println!("{}\t{}", reference.name(), pos);
    }
    println!("# active regions");
    for region in &regions {
        println!("{}\t{}", reference.name(), region);
    }
    println!("# indel candidates");
    for (key, confirmed) in &indel_confirmations {
        println!("{}\t{}\tconfirmed={}", reference.name(), key, confirmed);
    }
    info!(retained_candidates = store.len(), "stream finished");

    Ok(())
}

fn feed_block(
    detector: &mut ActiveRegionDetector<'_, IndelBuffer>,
    plan: &SimulationPlan,
    sample_id: SampleId,
    start: Pos,
    indel_key: Option<&IndelKey>,
) -> Result<()> {
    let end = start + plan.read_length;
    for align_id in 0..plan.depth {
        let carries_alt = align_id % 2 == 1;
        for pos in start..end {
            let is_snv = plan.snv_offsets.iter().any(|&offset| pos == start + offset);
            if carries_alt && is_snv {
                detector.insert_mismatch(align_id, pos, b'G')?;
            } else {
                detector.insert_match(align_id, pos)?;
            }

            if let Some(key) = indel_key.filter(|key| carries_alt && key.pos == pos) {
                let observation =
                    IndelObservation::new(key.clone(), IndelObservationData::tier1(align_id));
                detector.insert_indel(sample_id, &observation)?;
            }
        }
    }
    Ok(())
}
