use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use snake_game::{
    Dir, Engine, FileStore, GameConfig, MemoryStore, Phase, ScoreStore, Session, StepOutcome,
    HIGH_SCORE_KEY,
};
use tempfile::tempdir;

/// Turn that closes the distance to the food without reversing or crashing.
fn greedy_turn(engine: &Engine) -> Option<Dir> {
    let head = engine.head();
    let food = engine.food();
    let size = engine.grid_size() as isize;
    let mut best: Option<(usize, Dir)> = None;
    for dir in Dir::ALL {
        if dir == engine.direction().opposite() {
            continue;
        }
        let (dx, dy) = dir.delta();
        let nx = head.x as isize + dx;
        let ny = head.y as isize + dy;
        if nx < 0 || ny < 0 || nx >= size || ny >= size {
            continue;
        }
        let next = snake_game::Pos::new(nx as usize, ny as usize);
        if engine.snake().contains(&next) {
            continue;
        }
        let dist = next.x.abs_diff(food.x) + next.y.abs_diff(food.y);
        if best.map_or(true, |(d, _)| dist < d) {
            best = Some((dist, dir));
        }
    }
    best.map(|(_, dir)| dir)
}

fn play_until_first_meal<S: ScoreStore>(session: &mut Session<S>, rng: &mut StdRng) {
    let t0 = Instant::now();
    assert!(session.start(t0));
    for _ in 0..200 {
        if let Some(dir) = greedy_turn(session.engine()) {
            session.queue_direction(dir);
        }
        match session.tick(t0, rng) {
            Some(StepOutcome::Ate { .. }) => return,
            Some(StepOutcome::GameOver(c)) => panic!("died before eating: {c:?}"),
            _ => {}
        }
    }
    panic!("never reached the food");
}

#[test]
fn high_score_is_persisted_and_reloaded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scores.json");
    let mut rng = StdRng::seed_from_u64(21);

    let mut session = Session::new(GameConfig::classic(), FileStore::new(&path), &mut rng).unwrap();
    assert_eq!(session.high_score(), 0);
    play_until_first_meal(&mut session, &mut rng);
    assert_eq!(session.high_score(), 10);
    assert_eq!(session.store().get(HIGH_SCORE_KEY).unwrap(), Some(10));

    let reloaded = Session::new(GameConfig::classic(), FileStore::new(&path), &mut rng).unwrap();
    assert_eq!(reloaded.high_score(), 10);
}

#[test]
fn lower_scores_do_not_overwrite_the_record() {
    let mut store = MemoryStore::new();
    store.set(HIGH_SCORE_KEY, 500).unwrap();
    let mut rng = StdRng::seed_from_u64(22);
    let mut session = Session::new(GameConfig::classic(), store, &mut rng).unwrap();
    play_until_first_meal(&mut session, &mut rng);
    assert_eq!(session.high_score(), 500);
    assert_eq!(session.store().get(HIGH_SCORE_KEY).unwrap(), Some(500));
}

#[test]
fn sessions_are_independent() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut a = Session::new(GameConfig::classic(), MemoryStore::new(), &mut rng).unwrap();
    let b = Session::new(GameConfig::arena(), MemoryStore::new(), &mut rng).unwrap();
    let b_snake: Vec<_> = b.engine().snake().iter().copied().collect();

    play_until_first_meal(&mut a, &mut rng);
    assert_eq!(a.engine().score(), 10);
    assert_eq!(b.engine().score(), 0);
    assert_eq!(b.phase(), Phase::Ready);
    assert_eq!(b.engine().snake().iter().copied().collect::<Vec<_>>(), b_snake);
}

#[test]
fn ticker_drives_steps_at_the_configured_interval() {
    let mut rng = StdRng::seed_from_u64(24);
    let mut session = Session::new(GameConfig::classic(), MemoryStore::new(), &mut rng).unwrap();
    let t0 = Instant::now();
    assert_eq!(session.update(t0 + Duration::from_secs(1), &mut rng), None);

    session.start(t0);
    let head = session.engine().head();
    assert_eq!(session.update(t0 + Duration::from_millis(149), &mut rng), None);
    assert!(session.update(t0 + Duration::from_millis(150), &mut rng).is_some());
    assert_eq!(session.engine().head().x, head.x + 1);
}

#[test]
fn restart_from_game_over_resets_everything() {
    let mut rng = StdRng::seed_from_u64(25);
    let mut session = Session::new(GameConfig::classic(), MemoryStore::new(), &mut rng).unwrap();
    let t0 = Instant::now();
    session.start(t0);
    session.queue_direction(Dir::Down);
    while session.phase() == Phase::Running {
        session.tick(t0, &mut rng);
    }
    assert_eq!(session.phase(), Phase::GameOver);
    assert!(!session.queue_direction(Dir::Left));

    session.restart(&mut rng).unwrap();
    assert_eq!(session.phase(), Phase::Ready);
    assert!(!session.engine().is_over());
    assert_eq!(session.engine().score(), 0);
    assert_eq!(session.engine().snake().len(), 3);
    assert_eq!(session.final_score(), None);
}
