use criterion::{criterion_group, criterion_main, Criterion};
use nav::{Env, LineNav, LineNavConfig};

fn bench_line_nav(c: &mut Criterion) {
    c.bench_function("line_nav_step", |b| {
        let mut env = LineNav::new(LineNavConfig::default());
        env.reset();
        let mut i = 0usize;
        b.iter(|| {
            let (_, _, done) = env.step(i % 2);
            i += 1;
            if done {
                env.reset();
            }
        });
    });

    c.bench_function("line_nav_episode", |b| {
        let mut env = LineNav::new(LineNavConfig::default());
        b.iter(|| {
            env.reset();
            let mut i = 0usize;
            loop {
                let (_, _, done) = env.step(i % 2);
                i += 1;
                if done {
                    break;
                }
            }
        });
    });
}

criterion_group!(benches, bench_line_nav);
criterion_main!(benches);
