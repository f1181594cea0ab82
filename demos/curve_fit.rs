use dense_mlp::{loss, Matrix, Network};

fn main() -> dense_mlp::Result<()> {
    // Fit y = x^2 on a handful of points. The linear output layer lets the
    // network produce values well outside (0, 1).
    let points: Vec<(f64, f64)> = (-4..=4)
        .map(|i| {
            let x = f64::from(i) / 2.0;
            (x, x * x)
        })
        .collect();

    let mut net = Network::new_with_seed(&[1, 8, 1], 0.02, 7)?;
    println!("{net}");

    for epoch in 0..30_000 {
        for &(x, y) in &points {
            let input = Matrix::from_vec(1, 1, vec![x])?;
            let target = Matrix::from_vec(1, 1, vec![y])?;
            net.train(&input, &target)?;
        }
        if epoch % 3_000 == 0 {
            let mut total = 0.0;
            for &(x, y) in &points {
                let input = Matrix::from_vec(1, 1, vec![x])?;
                let target = Matrix::from_vec(1, 1, vec![y])?;
                total += loss::mse(&net.forward(&input)?, &target)?;
            }
            println!("epoch {epoch:>5}  mse {:.6}", total / points.len() as f64);
        }
    }

    for &(x, y) in &points {
        let out = net.forward(&Matrix::from_vec(1, 1, vec![x])?)?;
        println!(
            "x = {x:>4.1}  target = {y:>5.2}  predicted = {:>8.4}",
            out.get(0, 0)?
        );
    }
    Ok(())
}
