//! trial.rs：
//! - 試煉的唯一擁有者：戰鬥狀態、亂數源、延遲步驟佇列與觀察者都在 `Trial` 裡。
//! - 玩家行動同步完成；敵方回合透過延遲步驟排程，由呼叫端推進虛擬時鐘執行。
//! - 非法行動回傳錯誤，不改動狀態也不發出事件。
use crate::alias::{AdversaryId, Hp, Millis};
use crate::board::{distance, Board, Occupant, Position};
use crate::config::{BoardConfig, TrialConfig};
use crate::constants::ACTION_POINTS_PER_TURN;
use crate::entity::{Adversary, CharacterProfile, Hero};
use crate::error::{ActionError, Context, Result, TrialError};
use crate::event::{BattleEvent, BattleObserver};
use crate::loader::load_from_ascii;
use crate::logic::combat::{
    apply_damage, apply_heal, in_attack_range, resolve_spell, resolve_strike, SpellEffect,
    StrikeContext,
};
use crate::logic::movement::check_hero_move;
use crate::logic::spawn::spawn_adversaries;
use crate::policy::{decide_action, AdversaryAction};
use crate::scheduler::Scheduler;
use crate::state::{BattleState, Outcome, Phase};
use log::{debug, error, info};
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::rc::Rc;

/// 勝利時套用任務獎勵的外部協作者
///
/// 每場試煉最多呼叫一次，且在 `TrialEnded` 事件之前。
pub trait RewardApplier {
    fn apply_mission_reward(&mut self);
}

/// 不發放獎勵
impl RewardApplier for () {
    fn apply_mission_reward(&mut self) {}
}

impl<T: RewardApplier + ?Sized> RewardApplier for Rc<RefCell<T>> {
    fn apply_mission_reward(&mut self) {
        self.borrow_mut().apply_mission_reward();
    }
}

/// 指定的敵方配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdversaryPlacement {
    /// 原型鍵值
    pub archetype: String,
    pub position: Position,
}

/// 固定配置的試煉（劇本關卡與測試用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialSetup {
    pub profile: CharacterProfile,
    pub hero_position: Position,
    /// 依序給予編號 0, 1, 2...
    pub adversaries: Vec<AdversaryPlacement>,
    /// 佈局的棋盤尺寸，必須與設定相同；`None` 表示沿用設定
    pub board: Option<BoardConfig>,
}

impl TrialSetup {
    /// 由 ASCII 佈局建立配置
    ///
    /// `H` 為英雄（必須恰好一個），其他標記為原型鍵值。
    /// 敵方依讀取順序（先列後行）給予編號。
    ///
    /// ```text
    /// fire  .  stone .  .
    /// .     .  .     .  .
    /// .     .  H     .  .
    /// ```
    pub fn from_layout(profile: CharacterProfile, layout: &str) -> Result<Self> {
        let (board, mut markers) = load_from_ascii(layout)?;

        let heroes = markers.remove("H").unwrap_or_default();
        let [hero_position] = heroes.as_slice() else {
            return Err(TrialError::HeroPlacement {
                found: heroes.len(),
            }
            .into());
        };

        let mut adversaries: Vec<AdversaryPlacement> = markers
            .into_iter()
            .flat_map(|(archetype, positions)| {
                positions.into_iter().map(move |position| AdversaryPlacement {
                    archetype: archetype.clone(),
                    position,
                })
            })
            .collect();
        adversaries.sort_by_key(|p| (p.position.y, p.position.x));

        Ok(Self {
            profile,
            hero_position: *hero_position,
            adversaries,
            board: Some(BoardConfig {
                width: board.width(),
                height: board.height(),
            }),
        })
    }
}

/// 延遲執行的步驟
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScheduledStep {
    /// 敵方回合開始：決定本回合行動的敵方
    BeginAdversaryPhase,
    AdversaryTurn { id: AdversaryId, last: bool },
    ReturnToPlayer,
}

/// 一場試煉
pub struct Trial<R: rand::Rng = StdRng> {
    state: BattleState,
    config: TrialConfig,
    rng: R,
    scheduler: Scheduler<ScheduledStep>,
    observers: Vec<Box<dyn BattleObserver>>,
    reward: Box<dyn RewardApplier>,
}

impl<R: rand::Rng> Trial<R> {
    /// 開始新試煉：依角色資料建立英雄，隨機生成敵方
    ///
    /// 沒有角色資料時回傳 `MissingPrerequisite`，不建立任何狀態。
    pub fn start(
        profile: Option<&CharacterProfile>,
        config: TrialConfig,
        mut rng: R,
        reward: Box<dyn RewardApplier>,
    ) -> Result<Self> {
        let profile = profile.ok_or(TrialError::MissingPrerequisite)?;
        config.validate().context("開始試煉")?;

        let hero = Hero::from_profile(profile, &config);
        let adversaries = spawn_adversaries(&config, &mut rng);
        Self::assemble(hero, adversaries, config, rng, reward)
    }

    /// 以固定配置開始試煉
    pub fn from_setup(
        setup: TrialSetup,
        config: TrialConfig,
        rng: R,
        reward: Box<dyn RewardApplier>,
    ) -> Result<Self> {
        config.validate().context("開始試煉")?;
        if let Some(board) = setup.board.filter(|&b| b != config.board) {
            return Err(TrialError::LayoutSize {
                width: board.width,
                height: board.height,
                expected_width: config.board.width,
                expected_height: config.board.height,
            }
            .into());
        }

        let mut hero = Hero::from_profile(&setup.profile, &config);
        hero.position = setup.hero_position;

        let adversaries = (0..)
            .zip(&setup.adversaries)
            .map(|(id, placement)| -> Result<Adversary> {
                let archetype = config.archetype(&placement.archetype).ok_or_else(|| {
                    TrialError::UnknownArchetype {
                        key: placement.archetype.clone(),
                    }
                })?;
                Ok(Adversary::spawn(id, archetype, placement.position))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::assemble(hero, adversaries, config, rng, reward)
    }

    fn assemble(
        hero: Hero,
        adversaries: Vec<Adversary>,
        config: TrialConfig,
        rng: R,
        reward: Box<dyn RewardApplier>,
    ) -> Result<Self> {
        if adversaries.is_empty() {
            return Err(TrialError::NoAdversaries.into());
        }
        let mut board = Board::new(config.board.width, config.board.height);
        board
            .place(Occupant::Hero, hero.position)
            .context("放置英雄")?;
        for adversary in &adversaries {
            board
                .place(Occupant::Adversary(adversary.id), adversary.position)
                .context(format!("放置 {}", adversary.name()))?;
        }

        info!(
            "試煉開始：{} 對上 {} 個靈體",
            hero.name,
            adversaries.len()
        );

        Ok(Self {
            state: BattleState {
                hero,
                adversaries,
                board,
                phase: Phase::PlayerTurn,
                action_points: ACTION_POINTS_PER_TURN,
            },
            config,
            rng,
            scheduler: Scheduler::new(),
            observers: Vec::new(),
            reward,
        })
    }

    /// 唯讀的戰鬥狀態
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn config(&self) -> &TrialConfig {
        &self.config
    }

    /// 訂閱戰鬥事件
    ///
    /// 新訂閱者會先收到一次 `TrialStarted` 與當前狀態，之後收到每一個事件。
    pub fn subscribe(&mut self, mut observer: Box<dyn BattleObserver>) {
        let event = BattleEvent::TrialStarted {
            adversaries: self.state.adversaries.len(),
        };
        observer.notify(&event, &self.state);
        self.observers.push(observer);
    }

    /// 目前的虛擬時間（毫秒）
    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    /// 尚未執行的延遲步驟數
    pub fn pending_steps(&self) -> usize {
        self.scheduler.pending()
    }

    /// 推進虛擬時鐘，執行所有到期的步驟，回傳執行數量
    pub fn advance(&mut self, elapsed: Millis) -> usize {
        let deadline = self.scheduler.now().saturating_add(elapsed);
        let mut count = 0;
        while let Some(step) = self.scheduler.pop_due(deadline) {
            self.run_step(step);
            count += 1;
        }
        self.scheduler.advance_to(deadline);
        count
    }

    /// 執行所有延遲步驟直到佇列清空，回傳執行數量
    pub fn run_until_idle(&mut self) -> usize {
        let mut count = 0;
        while let Some(step) = self.scheduler.pop_next() {
            self.run_step(step);
            count += 1;
        }
        count
    }

    // ------------------------------------------------------------------
    // 玩家行動
    // ------------------------------------------------------------------

    /// 英雄移動到 `to`
    pub fn move_hero(&mut self, to: Position) -> Result<()> {
        self.check_player_can_act()?;

        let from = self.state.hero.position;
        let max = self.state.hero.move_range(&self.config);
        check_hero_move(&self.state.board, from, to, max)?;

        self.state.board.move_occupant(Occupant::Hero, to)?;
        self.state.hero.position = to;
        self.state.action_points -= 1;
        debug!("英雄移動 {from} -> {to}");

        self.emit(BattleEvent::HeroMoved { from, to });
        self.end_player_action();
        Ok(())
    }

    /// 英雄近戰攻擊
    pub fn attack(&mut self, target: AdversaryId) -> Result<()> {
        self.check_player_can_act()?;

        let hero = &self.state.hero;
        let adversary = self
            .state
            .adversary(target)
            .ok_or(ActionError::UnknownTarget { id: target })?;
        if !adversary.is_alive() {
            return Err(ActionError::TargetDefeated { id: target }.into());
        }
        if !in_attack_range(hero.position, adversary.position) {
            return Err(ActionError::TargetOutOfReach {
                id: target,
                distance: distance(hero.position, adversary.position),
            }
            .into());
        }

        let ctx = StrikeContext {
            attack: hero.attack,
            defense: adversary.defense,
            defending: false,
        };
        let strike = resolve_strike(&ctx, &self.config.combat, &mut self.rng);
        debug!("英雄攻擊 {target}: {}", strike.detail);

        let (remaining_hp, defeated) = self.damage_adversary(target, strike.damage);
        let mut events = vec![BattleEvent::AttackResolved {
            attacker: Occupant::Hero,
            target: Occupant::Adversary(target),
            damage: strike.damage,
            remaining_hp,
        }];
        if defeated {
            events.push(BattleEvent::AdversaryDefeated { id: target });
        }

        if self.state.all_adversaries_defeated() {
            self.emit_all(events);
            self.finish(Outcome::Victory);
            return Ok(());
        }

        self.state.action_points -= 1;
        self.emit_all(events);
        self.end_player_action();
        Ok(())
    }

    /// 施法：魔力高時範圍傷害，中等時治療自己，太低則失敗
    pub fn cast(&mut self) -> Result<()> {
        self.check_player_can_act()?;

        let magic = self.state.hero.magic;
        let effect =
            resolve_spell(magic, &self.config.spells).ok_or(ActionError::MagicTooWeak { magic })?;

        let mut events = Vec::new();
        match effect {
            SpellEffect::Area { damage } => {
                let targets: Vec<AdversaryId> =
                    self.state.living_adversaries().map(|a| a.id).collect();
                events.push(BattleEvent::SpellCast { effect });
                for id in targets {
                    if self.damage_adversary(id, damage).1 {
                        events.push(BattleEvent::AdversaryDefeated { id });
                    }
                }
                debug!("範圍法術：每個目標 {damage} 點傷害");
            }
            SpellEffect::Heal { amount } => {
                let hero = &mut self.state.hero;
                let before = hero.hp;
                hero.hp = apply_heal(hero.hp, hero.max_hp, amount);
                let healed = hero.hp - before;
                events.push(BattleEvent::SpellCast {
                    effect: SpellEffect::Heal { amount: healed },
                });
                debug!("治療：{before} -> {}", hero.hp);
            }
        }

        self.state.action_points -= 1;
        self.emit_all(events);

        if self.state.all_adversaries_defeated() {
            self.finish(Outcome::Victory);
            return Ok(());
        }
        self.end_player_action();
        Ok(())
    }

    /// 進入防禦姿態，持續到下一個玩家回合開始
    pub fn defend(&mut self) -> Result<()> {
        self.check_player_can_act()?;

        self.state.hero.defending = true;
        self.state.action_points -= 1;
        debug!("英雄防禦");

        self.emit(BattleEvent::HeroDefended);
        self.end_player_action();
        Ok(())
    }

    fn check_player_can_act(&self) -> Result<()> {
        match self.state.phase {
            Phase::Over(_) => Err(ActionError::TrialOver.into()),
            Phase::AdversaryPhase => Err(ActionError::NotPlayerTurn.into()),
            Phase::PlayerTurn if self.state.action_points == 0 => {
                Err(ActionError::NoActionPoints.into())
            }
            Phase::PlayerTurn => Ok(()),
        }
    }

    /// 對敵方造成傷害，被擊敗時清空其格子；回傳（剩餘生命, 是否因此被擊敗）
    fn damage_adversary(&mut self, id: AdversaryId, damage: Hp) -> (Hp, bool) {
        let Some(adversary) = self.state.adversary_mut(id) else {
            return (0, false);
        };
        let was_alive = adversary.is_alive();
        adversary.hp = apply_damage(adversary.hp, damage);
        let (remaining, position) = (adversary.hp, adversary.position);

        let defeated = was_alive && remaining == 0;
        if defeated {
            self.state.board.clear(position);
            debug!("敵方 {id} 被擊敗");
        }
        (remaining, defeated)
    }

    /// 行動點數用完時交給敵方
    fn end_player_action(&mut self) {
        if self.state.action_points > 0 || self.state.is_over() {
            return;
        }
        self.state.phase = Phase::AdversaryPhase;
        self.emit(BattleEvent::PhaseChanged {
            phase: Phase::AdversaryPhase,
        });
        self.scheduler.schedule(
            self.config.pacing.phase_start_delay,
            ScheduledStep::BeginAdversaryPhase,
        );
    }

    // ------------------------------------------------------------------
    // 敵方回合
    // ------------------------------------------------------------------

    fn run_step(&mut self, step: ScheduledStep) {
        if self.state.is_over() {
            return;
        }
        debug!("t={} 執行 {step:?}", self.scheduler.now());
        match step {
            ScheduledStep::BeginAdversaryPhase => self.begin_adversary_phase(),
            ScheduledStep::AdversaryTurn { id, last } => {
                self.adversary_turn(id);
                if last && !self.state.is_over() {
                    self.scheduler.schedule(
                        self.config.pacing.player_return_delay,
                        ScheduledStep::ReturnToPlayer,
                    );
                }
            }
            ScheduledStep::ReturnToPlayer => self.return_to_player(),
        }
    }

    /// 依編號順序排定本回合存活敵方的行動，彼此間隔一拍
    fn begin_adversary_phase(&mut self) {
        let acting: Vec<AdversaryId> = self.state.living_adversaries().map(|a| a.id).collect();
        if acting.is_empty() {
            self.scheduler.schedule(
                self.config.pacing.player_return_delay,
                ScheduledStep::ReturnToPlayer,
            );
            return;
        }

        let beat = self.config.pacing.adversary_action_delay;
        let last_index = acting.len() - 1;
        let mut delay: Millis = 0;
        for (index, id) in acting.into_iter().enumerate() {
            let last = index == last_index;
            self.scheduler
                .schedule(delay, ScheduledStep::AdversaryTurn { id, last });
            delay = delay.saturating_add(beat);
        }
    }

    fn adversary_turn(&mut self, id: AdversaryId) {
        let Some(adversary) = self.state.adversary(id).filter(|a| a.is_alive()) else {
            return;
        };
        let strike_ctx = StrikeContext {
            attack: adversary.attack,
            defense: self.state.hero.defense,
            defending: self.state.hero.defending,
        };

        let action = match decide_action(&self.state.board, id) {
            Ok(action) => action,
            Err(e) => {
                error!("敵方 {id} 無法決定行動：{e}");
                return;
            }
        };

        match action {
            AdversaryAction::Attack => {
                let strike = resolve_strike(&strike_ctx, &self.config.combat, &mut self.rng);
                let hero = &mut self.state.hero;
                hero.hp = apply_damage(hero.hp, strike.damage);
                debug!("敵方 {id} 攻擊英雄: {}", strike.detail);

                self.emit(BattleEvent::AttackResolved {
                    attacker: Occupant::Adversary(id),
                    target: Occupant::Hero,
                    damage: strike.damage,
                    remaining_hp: self.state.hero.hp,
                });
                if !self.state.hero.is_alive() {
                    self.finish(Outcome::Defeat);
                }
            }
            AdversaryAction::Step { to } => {
                let from = match self.state.board.move_occupant(Occupant::Adversary(id), to) {
                    Ok(from) => from,
                    Err(e) => {
                        error!("敵方 {id} 移動失敗：{e}");
                        return;
                    }
                };
                if let Some(adversary) = self.state.adversary_mut(id) {
                    adversary.position = to;
                }
                debug!("敵方 {id} 移動 {from} -> {to}");
                self.emit(BattleEvent::AdversaryMoved { id, from, to });
            }
            AdversaryAction::Hold => {
                debug!("敵方 {id} 被擋住");
                self.emit(BattleEvent::AdversaryHeld { id });
            }
        }
    }

    /// 回到玩家回合：補滿行動點數，解除防禦姿態
    fn return_to_player(&mut self) {
        self.state.phase = Phase::PlayerTurn;
        self.state.action_points = ACTION_POINTS_PER_TURN;
        self.state.hero.defending = false;
        self.emit(BattleEvent::PhaseChanged {
            phase: Phase::PlayerTurn,
        });
    }

    /// 結束試煉；勝利時先套用獎勵再發出結束事件
    fn finish(&mut self, outcome: Outcome) {
        self.state.phase = Phase::Over(outcome);
        self.scheduler.clear();
        if outcome == Outcome::Victory {
            self.reward.apply_mission_reward();
        }
        info!("試煉結束：{outcome}");
        self.emit(BattleEvent::TrialEnded { outcome });
    }

    fn emit(&mut self, event: BattleEvent) {
        for observer in &mut self.observers {
            observer.notify(&event, &self.state);
        }
    }

    fn emit_all(&mut self, events: Vec<BattleEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}
