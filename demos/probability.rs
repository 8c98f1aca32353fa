//! Probability of a boolean function under independent variable probabilities.
//!
//! Walks the diagram bottom-up through handle children:
//! `P(v ? hi : lo) = p(v) * P(hi) + (1 - p(v)) * P(lo)`.

use std::collections::HashMap;

use log::info;

use rcbdd::{BddNode, Manager, Ref};

fn probability(f: &BddNode, p: &[f64], memo: &mut HashMap<Ref, f64>) -> color_eyre::Result<f64> {
    if f.is_one() {
        return Ok(1.0);
    }
    if f.is_zero() {
        return Ok(0.0);
    }
    if let Some(&res) = memo.get(&f.edge()) {
        return Ok(res);
    }

    let v = f.node_index()?.index() as usize;
    let high = probability(&f.then_child()?, p, memo)?;
    let low = probability(&f.else_child()?, p, memo)?;
    let res = p[v] * high + (1.0 - p[v]) * low;
    memo.insert(f.edge(), res);
    Ok(res)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let p = [0.1, 0.2, 0.3];
    let mgr = Manager::new(p.len(), 1 << 10, 1 << 10)?;
    let x: Vec<BddNode> = (0..p.len() as u32).map(|i| mgr.var(i)).collect::<Result<_, _>>()?;

    let f_and = mgr.apply_and(&x[0], &x[1])?;
    let f_or = mgr.apply_or_many(&x)?;
    let f_maj = {
        let ab = mgr.apply_and(&x[0], &x[1])?;
        let ac = mgr.apply_and(&x[0], &x[2])?;
        let bc = mgr.apply_and(&x[1], &x[2])?;
        mgr.apply_or_many([&ab, &ac, &bc])?
    };
    let f_mix = {
        let bc = mgr.apply_or(&x[1], &x[2])?;
        mgr.apply_and(&x[0], &bc)?
    };

    for (name, f) in [
        ("x0 & x1", &f_and),
        ("x0 | x1 | x2", &f_or),
        ("at least two of x0, x1, x2", &f_maj),
        ("x0 & (x1 | x2)", &f_mix),
    ] {
        let mut memo = HashMap::new();
        let prob = probability(f, &p, &mut memo)?;
        info!("{}: {} nodes, {} minterms", name, f.dag_size()?, mgr.minterms(f, p.len())?);
        println!("P[{}] = {:.4}", name, prob);
    }

    println!("{}", mgr.to_dot(&[&f_maj, &f_mix])?);

    Ok(())
}
