use clap::Parser;
use log::info;

use rcbdd::{BddConfig, BddNode, Manager};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of queens.
    #[arg(value_name = "INT", default_value = "8")]
    n: usize,

    /// Initial node table capacity (in bits, so the actual size is `2^size` nodes).
    #[clap(long, value_name = "INT", default_value = "16")]
    size: usize,

    /// Operation cache size (in bits).
    #[clap(long, value_name = "INT", default_value = "18")]
    cache: usize,

    /// Dead node count that triggers garbage collection.
    #[clap(long, value_name = "INT", default_value = "16384")]
    gc_threshold: usize,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let n = args.n;
    let mgr = Manager::with_config(
        BddConfig::default()
            .with_num_vars(n * n)
            .with_table_size(1 << args.size)
            .with_cache_size(1 << args.cache)
            .with_gc_threshold(args.gc_threshold),
    )?;

    // Variable `i * n + j` means "a queen stands at row i, column j".
    let mut queens: Vec<Vec<BddNode>> = Vec::with_capacity(n);
    for i in 0..n {
        let row = (0..n)
            .map(|j| mgr.var((i * n + j) as u32))
            .collect::<Result<Vec<_>, _>>()?;
        queens.push(row);
    }

    info!("Encoding n-queens problem with n = {}", n);
    let mut res = mgr.one()?;

    // At least one queen per row.
    for row in &queens {
        let any = mgr.apply_or_many(row)?;
        res = mgr.apply_and(&res, &any)?;
    }

    // No two queens attack each other.
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                for l in 0..n {
                    if (i, j) >= (k, l) {
                        continue;
                    }
                    let same_row = i == k;
                    let same_col = j == l;
                    let same_diag = i + l == k + j || i + j == k + l;
                    if same_row || same_col || same_diag {
                        let both = mgr.apply_and(&queens[i][j], &queens[k][l])?;
                        res = mgr.apply_and(&res, &mgr.apply_not(&both)?)?;
                    }
                }
            }
        }
        info!("row {} done, {} live nodes", i, mgr.node_count()?);
    }

    println!("solutions: {}", mgr.sat_count(&res, n * n)?);
    println!("result size: {}", res.dag_size()?);
    println!("mgr = {:?}", mgr);
    println!("cache hits: {}", mgr.cache_hits()?);
    println!("cache misses: {}", mgr.cache_misses()?);

    drop(res);
    drop(queens);
    let freed = mgr.collect_garbage()?;
    println!("freed {} nodes, {} remain", freed, mgr.table_size()?);
    mgr.close();

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
