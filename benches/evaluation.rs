use corvid::board::fen;
use corvid::board::zobrist::ZobristRandoms;
use corvid::board::Board;
use corvid::defs::FEN_START_POSITION;
use corvid::evaluate_position;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

const TEST_POSITIONS: &[(&str, &str)] = &[
    (FEN_START_POSITION, "Starting Position"),
    (
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        "After 1.e4",
    ),
    (
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 4 4",
        "Italian Game",
    ),
    (
        "r2q1rk1/ppp2ppp/2np1n2/2b1p1B1/2B1P3/3P1N2/PPP2PPP/RN1Q1RK1 w - - 0 9",
        "Complex Middlegame",
    ),
    ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", "King and Pawn Endgame"),
    ("8/8/8/8/8/8/8/K7 w - - 0 1", "Lone King"),
];

fn setup_position(fen_str: &str) -> Board {
    let mut board = Board::new(Arc::new(ZobristRandoms::new()));
    fen::read(&mut board, fen_str).expect("valid FEN");
    board
}

fn bench_evaluation_positions(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation_positions");

    for (fen_str, name) in TEST_POSITIONS {
        let board = setup_position(fen_str);

        group.bench_with_input(BenchmarkId::new("evaluate_position", name), fen_str, |b, _| {
            b.iter(|| black_box(evaluate_position(&board)));
        });
    }

    group.finish();
}

fn bench_evaluation_after_make_unmake(c: &mut Criterion) {
    use corvid::board::playmove::{make_move, take_move};
    use corvid::movegen::defs::Ordering;
    use corvid::movegen::generate_all;

    let mut board = setup_position(
        "r2q1rk1/ppp2ppp/2np1n2/2b1p1B1/2B1P3/3P1N2/PPP2PPP/RN1Q1RK1 w - - 0 9",
    );
    let ordering = Ordering::new();

    c.bench_function("evaluate_after_make_unmake", |b| {
        b.iter(|| {
            let list = generate_all(&board, &ordering, board.ply);
            if list.len() > 0 {
                let mv = list.get(0).mv;
                if make_move(&mut board, mv) {
                    black_box(evaluate_position(&board));
                    take_move(&mut board);
                }
            }
        });
    });
}

criterion_group!(benches, bench_evaluation_positions, bench_evaluation_after_make_unmake);
criterion_main!(benches);
