use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Waiting -> Playing (start)
/// - Playing -> Won
/// - Playing -> Lost
/// - any -> Playing (reset, difficulty change)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// No player name entered yet
    #[default]
    Waiting,
    Playing,
    Won,
    Lost,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActivateOutcome {
    Ignored,
    Revealed(CellCount),
    Lost,
    /// `rank` is the 0-based ranking position when the time was recorded.
    Won {
        rank: Option<usize>,
    },
}

impl ActivateOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Everything a presentation layer needs to draw the game after a command.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub cells: Array2<CellView>,
    pub status: SessionStatus,
    pub difficulty: DifficultyPreset,
    pub label: &'static str,
    pub flag_count: CellCount,
    /// Mines minus flags, negative when over-flagged.
    pub mines_left: i32,
    pub elapsed_secs: u32,
    pub paused: bool,
    pub muted: bool,
    pub player_name: String,
}

/// A player's run of games: owns the current board, timer and ranking view.
pub struct GameSession<S, P = RandomMinePlacer> {
    store: S,
    placer: P,
    feedback: Box<dyn Feedback>,
    preset: DifficultyPreset,
    board: Board,
    status: SessionStatus,
    first_click_done: bool,
    flag_count: CellCount,
    elapsed_secs: u32,
    paused: bool,
    muted: bool,
    player_name: String,
    triggered_mine: Option<Coord2>,
    ranking: Vec<RankingEntry>,
}

impl<S: RankingStore, P: MinePlacer> GameSession<S, P> {
    pub fn new(store: S, placer: P) -> Self {
        let preset = DifficultyPreset::default();
        let mut session = Self {
            store,
            placer,
            feedback: Box::new(Silent),
            preset,
            board: Board::new(preset.difficulty()),
            status: SessionStatus::Waiting,
            first_click_done: false,
            flag_count: 0,
            elapsed_secs: 0,
            paused: false,
            muted: false,
            player_name: String::new(),
            triggered_mine: None,
            ranking: Vec::new(),
        };
        session.reload_ranking();
        session
    }

    /// Picks the difficulty the first game will use, without leaving the waiting state.
    ///
    /// On a session that already started this behaves like [`Self::change_difficulty`].
    pub fn with_difficulty(mut self, preset: DifficultyPreset) -> Self {
        if self.status == SessionStatus::Waiting {
            self.preset = preset;
            self.clear_board();
        } else {
            self.change_difficulty(preset);
        }
        self
    }

    pub fn with_feedback(mut self, feedback: impl Feedback + 'static) -> Self {
        self.feedback = Box::new(feedback);
        self
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn preset(&self) -> DifficultyPreset {
        self.preset
    }

    pub fn difficulty(&self) -> Difficulty {
        self.preset.difficulty()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    pub fn mines_left(&self) -> i32 {
        i32::from(self.difficulty().mines) - i32::from(self.flag_count)
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Best times of the current difficulty, fastest first.
    pub fn ranking(&self) -> &[RankingEntry] {
        &self.ranking
    }

    /// Whether ticks currently advance the clock.
    pub fn is_timer_running(&self) -> bool {
        self.status == SessionStatus::Playing && self.first_click_done && !self.paused
    }

    /// Leaves the waiting state with the given player name.
    ///
    /// A blank name is rejected and the session keeps waiting. Once started, further calls are
    /// ignored.
    pub fn start(&mut self, name: &str) -> Result<()> {
        if self.status != SessionStatus::Waiting {
            log::debug!("Ignoring start, session is already {:?}", self.status);
            return Ok(());
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyPlayerName);
        }

        self.player_name = name.to_owned();
        log::info!("Starting session for {}", self.player_name);
        self.reset();
        Ok(())
    }

    /// Opens a cell. The first activation of each game places the mines around it.
    pub fn activate(&mut self, coords: Coord2) -> ActivateOutcome {
        if self.paused || self.status != SessionStatus::Playing {
            return ActivateOutcome::Ignored;
        }
        match self.board.get(coords) {
            Some(cell) if !cell.flagged => {}
            _ => return ActivateOutcome::Ignored,
        }

        if !self.first_click_done {
            self.placer.place_mines(&mut self.board, coords);
            self.first_click_done = true;
            log::debug!("First activation at {:?}, timer started", coords);
        }

        match self.board.reveal(coords) {
            RevealOutcome::NoChange => ActivateOutcome::Ignored,
            RevealOutcome::HitMine => {
                self.triggered_mine = Some(coords);
                self.board.reveal_all_mines();
                self.end_game(false);
                ActivateOutcome::Lost
            }
            RevealOutcome::Revealed(count) if self.board.check_win() => {
                let rank = self.record_win();
                self.end_game(true);
                log::debug!("Last {} safe cells revealed", count);
                ActivateOutcome::Won { rank }
            }
            RevealOutcome::Revealed(count) => ActivateOutcome::Revealed(count),
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        if self.paused || self.status != SessionStatus::Playing {
            return MarkOutcome::NoChange;
        }

        let outcome = self.board.toggle_flag(coords);
        match outcome {
            MarkOutcome::Flagged => self.flag_count += 1,
            MarkOutcome::Unflagged => self.flag_count -= 1,
            MarkOutcome::NoChange => {}
        }
        outcome
    }

    /// Throws away the current board and starts over with the same difficulty.
    ///
    /// The pause flag is kept.
    pub fn reset(&mut self) {
        self.status = SessionStatus::Playing;
        self.clear_board();
    }

    pub fn change_difficulty(&mut self, preset: DifficultyPreset) {
        self.preset = preset;
        self.reset();
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Once-per-second clock event. Returns whether the elapsed time changed.
    pub fn tick(&mut self) -> bool {
        if self.is_timer_running() {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
            true
        } else {
            false
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut cells = self.board.cells().map(|cell| cell.view());
        if let Some(coords) = self.triggered_mine {
            cells[coords.to_nd_index()] = CellView::Exploded;
        }

        Snapshot {
            cells,
            status: self.status,
            difficulty: self.preset,
            label: self.preset.label(),
            flag_count: self.flag_count,
            mines_left: self.mines_left(),
            elapsed_secs: self.elapsed_secs,
            paused: self.paused,
            muted: self.muted,
            player_name: self.player_name.clone(),
        }
    }

    fn end_game(&mut self, won: bool) {
        self.status = if won {
            SessionStatus::Won
        } else {
            SessionStatus::Lost
        };
        log::info!(
            "Game {:?} after {}",
            self.status,
            format_time(self.elapsed_secs)
        );

        if self.muted {
            return;
        }
        if won {
            self.feedback.on_win();
        } else {
            self.feedback.on_loss();
        }
    }

    fn record_win(&mut self) -> Option<usize> {
        if self.player_name.is_empty() {
            return None;
        }

        let label = self.preset.label();
        match self
            .store
            .record_result(label, &self.player_name, self.elapsed_secs)
        {
            Ok((table, rank)) => {
                self.ranking = table.get(label).to_vec();
                rank
            }
            Err(err) => {
                log::error!("Could not save ranking: {}", err);
                None
            }
        }
    }

    /// Fresh board for the current preset, with the per-game counters zeroed.
    fn clear_board(&mut self) {
        self.board = Board::new(self.preset.difficulty());
        self.first_click_done = false;
        self.flag_count = 0;
        self.elapsed_secs = 0;
        self.triggered_mine = None;
        self.reload_ranking();
        log::debug!("New {} board", self.preset.label());
    }

    fn reload_ranking(&mut self) {
        self.ranking = self
            .store
            .load_or_default()
            .get(self.preset.label())
            .to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::testing::{Event, Recorder};

    /// Top row plus the first cell of the second row, ten mines for the easy board.
    ///
    /// Opening `(8, 8)` clears the rest of the board in one go, opening `(1, 1)` opens one cell.
    const EASY_LAYOUT: [Coord2; 10] = [
        (0, 0),
        (0, 1),
        (0, 2),
        (0, 3),
        (0, 4),
        (0, 5),
        (0, 6),
        (0, 7),
        (0, 8),
        (1, 0),
    ];

    fn session<S: RankingStore>(store: S) -> GameSession<S, FixedMinePlacer> {
        GameSession::new(store, FixedMinePlacer::new(EASY_LAYOUT))
    }

    fn started<S: RankingStore>(store: S) -> GameSession<S, FixedMinePlacer> {
        let mut session = session(store);
        session.start("Ana").unwrap();
        session
    }

    #[test]
    fn new_session_waits_for_a_name() {
        let mut session = session(MemoryRankingStore::new());

        assert_eq!(session.status(), SessionStatus::Waiting);
        assert_eq!(session.activate((4, 4)), ActivateOutcome::Ignored);
        assert_eq!(session.toggle_flag((4, 4)), MarkOutcome::NoChange);
        assert!(!session.tick());
    }

    #[test]
    fn blank_name_blocks_start() {
        let mut session = session(MemoryRankingStore::new());

        assert_eq!(session.start("   "), Err(GameError::EmptyPlayerName));
        assert_eq!(session.status(), SessionStatus::Waiting);

        assert_eq!(session.start("  Ana "), Ok(()));
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.player_name(), "Ana");
    }

    #[test]
    fn first_activation_places_mines_away_from_it() {
        let mut session = GameSession::new(MemoryRankingStore::new(), RandomMinePlacer::new(3));
        session.start("Ana").unwrap();
        assert_eq!(session.board().mine_count(), 0);

        let outcome = session.activate((4, 4));

        assert!(matches!(
            outcome,
            ActivateOutcome::Revealed(_) | ActivateOutcome::Won { .. }
        ));
        assert_eq!(session.board().mine_count(), 10);
        assert!(!session.board()[(4, 4)].is_mine);
        assert!(session.board()[(4, 4)].revealed);
    }

    #[test]
    fn activating_a_mine_loses_and_reveals_all_mines() {
        let mut session = started(MemoryRankingStore::new());
        assert_eq!(session.activate((1, 1)), ActivateOutcome::Revealed(1));
        session.tick();

        assert_eq!(session.activate((0, 5)), ActivateOutcome::Lost);

        assert_eq!(session.status(), SessionStatus::Lost);
        assert_eq!(session.triggered_mine(), Some((0, 5)));
        let board = session.board();
        for coords in board.iter_coords() {
            let expected = board[coords].is_mine || coords == (1, 1);
            assert_eq!(board[coords].revealed, expected, "{coords:?}");
        }

        let snapshot = session.snapshot();
        assert_eq!(snapshot.cells[[0, 5]], CellView::Exploded);
        assert_eq!(snapshot.cells[[0, 0]], CellView::Mine);
        assert_eq!(snapshot.cells[[5, 5]], CellView::Hidden);

        // the clock stops and the board is frozen
        assert!(!session.tick());
        assert_eq!(session.elapsed_secs(), 1);
        assert_eq!(session.activate((5, 5)), ActivateOutcome::Ignored);
        assert_eq!(session.toggle_flag((5, 5)), MarkOutcome::NoChange);
    }

    #[test]
    fn winning_records_time_in_the_ranking() {
        let store = MemoryRankingStore::new();
        let mut session = started(&store);

        session.activate((1, 1));
        for _ in 0..45 {
            session.tick();
        }
        assert_eq!(session.activate((8, 8)), ActivateOutcome::Won { rank: Some(0) });
        assert_eq!(session.status(), SessionStatus::Won);

        session.reset();
        session.activate((1, 1));
        for _ in 0..30 {
            session.tick();
        }
        assert_eq!(session.activate((8, 8)), ActivateOutcome::Won { rank: Some(0) });

        let times: Vec<_> = session.ranking().iter().map(|e| e.time_secs).collect();
        assert_eq!(times, [30, 45]);
        assert_eq!(store.load().unwrap().get("Fácil"), session.ranking());
        assert!(store.load().unwrap().get("Medio").is_empty());
    }

    #[test]
    fn win_without_player_name_is_not_recorded() {
        let store = MemoryRankingStore::new();
        let mut session = session(&store);
        session.reset();

        assert_eq!(session.activate((8, 8)), ActivateOutcome::Won { rank: None });
        assert_eq!(store.record(), None);
    }

    #[test]
    fn unflagged_mines_do_not_prevent_a_win() {
        let mut session = started(MemoryRankingStore::new());

        let outcome = session.activate((8, 8));

        assert!(matches!(outcome, ActivateOutcome::Won { .. }));
        assert_eq!(session.flag_count(), 0);
    }

    #[test]
    fn flag_counter_follows_toggles() {
        let mut session = started(MemoryRankingStore::new());

        assert_eq!(session.toggle_flag((3, 3)), MarkOutcome::Flagged);
        assert_eq!(session.flag_count(), 1);
        assert_eq!(session.mines_left(), 9);

        assert_eq!(session.toggle_flag((3, 3)), MarkOutcome::Unflagged);
        assert_eq!(session.flag_count(), 0);
        assert_eq!(session.mines_left(), 10);
    }

    #[test]
    fn mines_left_goes_negative_when_over_flagged() {
        let mut session = started(MemoryRankingStore::new());
        for col in 0..9 {
            session.toggle_flag((5, col));
            session.toggle_flag((6, col));
        }

        assert_eq!(session.flag_count(), 18);
        assert_eq!(session.snapshot().mines_left, -8);
    }

    #[test]
    fn flagged_cell_cannot_be_activated() {
        let mut session = started(MemoryRankingStore::new());
        session.toggle_flag((4, 4));

        assert_eq!(session.activate((4, 4)), ActivateOutcome::Ignored);
        // the first click has not happened yet
        assert_eq!(session.board().mine_count(), 0);
        assert!(!session.tick());
    }

    #[test]
    fn out_of_bounds_activation_is_ignored() {
        let mut session = started(MemoryRankingStore::new());

        assert!(!session.activate((9, 0)).has_update());
        assert!(!session.toggle_flag((0, 9)).has_update());
        assert_eq!(session.board().mine_count(), 0);
        assert!(session.activate((1, 1)).has_update());
    }

    #[test]
    fn pause_freezes_clock_and_input() {
        let mut session = started(MemoryRankingStore::new());
        session.activate((1, 1));
        session.tick();

        session.pause();
        assert!(!session.tick());
        assert_eq!(session.activate((8, 8)), ActivateOutcome::Ignored);
        assert_eq!(session.toggle_flag((8, 8)), MarkOutcome::NoChange);
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.elapsed_secs(), 1);

        session.resume();
        assert!(session.tick());
        assert_eq!(session.elapsed_secs(), 2);
        assert!(session.toggle_pause());
        assert!(session.snapshot().paused);
        assert!(!session.toggle_pause());
    }

    #[test]
    fn clock_starts_on_first_activation() {
        let mut session = started(MemoryRankingStore::new());

        assert!(!session.tick());
        session.activate((1, 1));
        assert!(session.tick());
        assert_eq!(session.elapsed_secs(), 1);
    }

    #[test]
    fn reset_discards_the_board_and_replaces_mines_on_next_click() {
        let mut session = started(MemoryRankingStore::new());
        session.activate((1, 1));
        session.toggle_flag((5, 5));
        session.tick();
        session.activate((0, 0));
        assert_eq!(session.status(), SessionStatus::Lost);

        session.reset();

        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.board().mine_count(), 0);
        assert_eq!(session.flag_count(), 0);
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(session.triggered_mine(), None);
        assert!(session.snapshot().cells.iter().all(|&c| c == CellView::Hidden));

        session.activate((1, 1));
        assert_eq!(session.board().mine_count(), 10);
    }

    #[test]
    fn reset_keeps_pause() {
        let mut session = started(MemoryRankingStore::new());
        session.pause();

        session.reset();

        assert!(session.is_paused());
        assert_eq!(session.activate((1, 1)), ActivateOutcome::Ignored);
    }

    #[test]
    fn change_difficulty_resizes_board_and_reloads_ranking() {
        let store = MemoryRankingStore::new();
        let mut table = RankingTable::new();
        table.record("Medio", "Bo", 120);
        store.save(&table).unwrap();

        let mut session = GameSession::new(&store, RandomMinePlacer::new(5));
        session.start("Ana").unwrap();
        assert!(session.ranking().is_empty());

        session.change_difficulty(DifficultyPreset::Medium);

        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.board().size(), (16, 16));
        assert_eq!(session.mines_left(), 40);
        assert_eq!(session.ranking()[0].name, "Bo");
        assert_eq!(session.snapshot().label, "Medio");
    }

    #[test]
    fn with_difficulty_keeps_waiting() {
        let session = GameSession::new(MemoryRankingStore::new(), RandomMinePlacer::new(5))
            .with_difficulty(DifficultyPreset::Hard);

        assert_eq!(session.status(), SessionStatus::Waiting);
        assert_eq!(session.board().size(), (16, 30));
    }

    #[test]
    fn with_difficulty_mid_game_starts_a_fresh_board() {
        let mut session = started(MemoryRankingStore::new());
        assert_eq!(session.activate((1, 1)), ActivateOutcome::Revealed(1));
        session.toggle_flag((5, 5));
        session.tick();

        let mut session = session.with_difficulty(DifficultyPreset::Medium);

        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.preset(), DifficultyPreset::Medium);
        assert_eq!(session.flag_count(), 0);
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(session.board().mine_count(), 0);

        // mines are placed again on the next click
        assert!(matches!(
            session.activate((8, 8)),
            ActivateOutcome::Revealed(_)
        ));
        assert_eq!(session.board().mine_count(), 10);
        assert!(session.tick());
    }

    #[test]
    fn corrupt_ranking_does_not_break_the_game() {
        let store = MemoryRankingStore::with_record("[]]");
        let mut session = started(&store);
        assert!(session.ranking().is_empty());

        assert_eq!(session.activate((8, 8)), ActivateOutcome::Won { rank: Some(0) });
        assert_eq!(store.load().unwrap().get("Fácil").len(), 1);
    }

    #[test]
    fn feedback_fires_unless_muted() {
        let recorder = Recorder::default();
        let events = recorder.0.clone();
        let mut session = started(MemoryRankingStore::new()).with_feedback(recorder);

        session.activate((1, 1));
        session.activate((0, 0));
        assert_eq!(*events.borrow(), [Event::Loss]);

        session.reset();
        assert!(session.toggle_mute());
        session.activate((8, 8));
        assert_eq!(session.status(), SessionStatus::Won);
        assert_eq!(*events.borrow(), [Event::Loss]);

        session.set_muted(false);
        session.reset();
        session.activate((8, 8));
        assert_eq!(*events.borrow(), [Event::Loss, Event::Win]);
    }

    #[test]
    fn start_after_start_is_ignored() {
        let mut session = started(MemoryRankingStore::new());
        session.activate((1, 1));

        assert_eq!(session.start("Bo"), Ok(()));
        assert_eq!(session.player_name(), "Ana");
        assert!(session.board()[(1, 1)].revealed);
    }
}
