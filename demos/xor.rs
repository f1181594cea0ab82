use dense_mlp::{loss, Matrix, Network};

fn main() -> dense_mlp::Result<()> {
    // Classic XOR dataset, fitted as regression onto 0.0 / 1.0.
    let inputs = [
        Matrix::from_vec(2, 1, vec![0.0, 0.0])?,
        Matrix::from_vec(2, 1, vec![0.0, 1.0])?,
        Matrix::from_vec(2, 1, vec![1.0, 0.0])?,
        Matrix::from_vec(2, 1, vec![1.0, 1.0])?,
    ];
    let targets = [
        Matrix::from_vec(1, 1, vec![0.0])?,
        Matrix::from_vec(1, 1, vec![1.0])?,
        Matrix::from_vec(1, 1, vec![1.0])?,
        Matrix::from_vec(1, 1, vec![0.0])?,
    ];

    let mut net = Network::new_with_seed(&[2, 4, 1], 0.1, 0)?;
    println!("{net}");

    for epoch in 0..20_000 {
        for (x, t) in inputs.iter().zip(&targets) {
            net.train(x, t)?;
        }
        if epoch % 2_000 == 0 {
            let mut total = 0.0;
            for (x, t) in inputs.iter().zip(&targets) {
                total += loss::mse(&net.forward(x)?, t)?;
            }
            println!("epoch {epoch:>5}  mse {:.6}", total / inputs.len() as f64);
        }
    }

    for x in &inputs {
        let y = net.forward(x)?;
        println!(
            "({}, {}) -> {:.4}",
            x.get(0, 0)?,
            x.get(1, 0)?,
            y.get(0, 0)?
        );
    }
    Ok(())
}
