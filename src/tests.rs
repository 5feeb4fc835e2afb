#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use itertools::Itertools;
    use petgraph::algo::dijkstra;
    use strum::{Display as StrumDisplay, VariantArray};

    use crate::builder::{ConfigInvalidReason, SessionBuilder};
    use crate::error::ExploreError;
    use crate::explorer::{Explorer, Phase};
    use crate::graph_view::GraphView;
    use crate::hanoi::{Hanoi, HanoiMove};
    use crate::iwahswap::Iwahswap;
    use crate::layout::{ForceLayout, LayoutConfig};
    use crate::node::{NodeId, NodeKind};
    use crate::point::Vec2;
    use crate::puzzle::{Puzzle, StateKey};
    use crate::render::{self, DrawCommand, DrawList};
    use crate::session::Task;
    use crate::view::{Gesture, InteractionMode, ViewConfig, ViewTransform};

    const VIEWPORT: Vec2 = Vec2 { x: 800.0, y: 600.0 };

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, VariantArray, StrumDisplay)]
    enum Step {
        Forward,
        Back,
    }

    /// Positions on a cycle, with an optional winning position.
    #[derive(Clone, Debug)]
    struct Ring {
        at: u8,
        size: u8,
        goal: Option<u8>,
    }

    impl Puzzle for Ring {
        type Move = Step;

        fn apply(&self, mv: Step) -> Option<Self> {
            let at = match mv {
                Step::Forward => (self.at + 1) % self.size,
                Step::Back => (self.at + self.size - 1) % self.size,
            };
            Some(Self { at, ..self.clone() })
        }

        fn key(&self) -> StateKey {
            StateKey::new(self.at.to_string())
        }

        fn is_goal(&self) -> bool {
            self.goal == Some(self.at)
        }
    }

    fn explored_hanoi(disks: u8) -> Explorer<Hanoi> {
        let mut explorer = Explorer::starting_from(Hanoi::new(disks));
        explorer.run_to_exhaustion();
        explorer
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-9
    }

    fn revealed_view(explorer: &mut Explorer<Hanoi>) -> GraphView<Hanoi> {
        let mut view = GraphView::new(LayoutConfig::default(), ViewConfig::default(), VIEWPORT);
        view.reveal_batch(explorer, usize::MAX);
        view
    }

    fn screen_of(view: &GraphView<Hanoi>, id: NodeId) -> Vec2 {
        view.project_to_screen(view.layout().position(id).unwrap())
    }

    #[test]
    fn hanoi_key_format() {
        assert_eq!(Hanoi::new(3).key().as_str(), "3,2,1||");
        assert_eq!(format!("{}", Hanoi::new(3)), "|3 2 1\n|\n|\n");
        assert_eq!(Hanoi::from_towers([vec![3], vec![1], vec![2]]).unwrap().key(), StateKey::from("3|1|2"));
        assert!(Hanoi::from_towers([vec![1, 2], vec![], vec![3]]).is_none());
        assert_eq!(Hanoi::num_directions(), 6);
        assert_eq!(Hanoi::direction(5), Some(HanoiMove::TwoToOne));
        assert_eq!(Hanoi::direction(6), None);
    }

    #[test]
    fn hanoi_three_disks() {
        let mut explorer = explored_hanoi(3);

        assert_eq!(explorer.len(), 27);
        assert_eq!(explorer.adjacency().edge_count(), 39);
        assert_eq!(explorer.phase(), Phase::Exhausted);
        assert_eq!(explorer.frontier_len(), 0);

        let start = explorer.start().unwrap();
        let goal = explorer.goal().unwrap();
        assert_eq!(explorer[start].kind(), NodeKind::Start);
        assert_eq!(explorer[goal].kind(), NodeKind::Goal);
        assert_eq!(explorer[goal].key().as_str(), "||3,2,1");
        assert_eq!(explorer[goal].depth(), 7);

        assert!(!explorer.has_goal_distances());
        assert_eq!(explorer.compute_goal_distances(), 27);
        assert!(explorer.has_goal_distances());
        assert_eq!(explorer[start].goal_distance(), Some(7));
        assert_eq!(explorer[goal].goal_distance(), Some(0));

        let path = explorer.shortest_path(start, goal).unwrap();
        assert_eq!(path.len(), 8);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for (a, b) in path.iter().tuple_windows() {
            assert!(explorer.is_adjacent(*a, *b));
            assert_eq!(explorer[*a].goal_distance().unwrap(), explorer[*b].goal_distance().unwrap() + 1);
        }

        assert_eq!(explorer.reconstruct_shortest_path(goal, goal), vec![goal]);
    }

    #[test]
    fn depth_is_breadth_first() {
        let mut explorer = explored_hanoi(4);
        explorer.compute_goal_distances();

        let start = explorer.start().unwrap();
        let goal = explorer.goal().unwrap();
        let from_start = dijkstra(explorer.adjacency(), start, None, |_| 1u32);
        let from_goal = dijkstra(explorer.adjacency(), goal, None, |_| 1u32);

        assert_eq!(from_start.len(), 81);
        for (id, node) in explorer.nodes() {
            assert_eq!(node.depth(), from_start[&id]);
            assert_eq!(node.goal_distance(), Some(from_goal[&id]));
            if let Some(parent) = node.parent() {
                assert_eq!(explorer[parent].depth() + 1, node.depth());
            }
        }
    }

    #[test]
    fn edges_are_symmetric_and_unique() {
        let explorer = explored_hanoi(3);

        for (id, node) in explorer.nodes() {
            let neighbors = explorer.neighbors(id).collect_vec();
            assert_eq!(neighbors.len(), node.state().legal_moves().len());
            assert!(neighbors.iter().map(|(other, _)| *other).all_unique());

            for (other, mv) in neighbors {
                assert!(explorer.neighbors(other).any(|(back, _)| back == id));
                // every hanoi move is reversible, so both sides are known once exhausted
                let mv = mv.unwrap();
                assert_eq!(&node.state().apply(mv).unwrap().key(), explorer[other].key());
            }
        }
    }

    #[test]
    fn keys_are_unique() {
        let explorer = explored_hanoi(3);
        assert!(explorer.nodes().map(|(_, node)| node.key().clone()).all_unique());
        for (id, node) in explorer.nodes() {
            assert_eq!(explorer.id_of(node.key()), Some(id));
        }
    }

    #[test]
    fn reveal_in_discovery_order() {
        let mut explorer = Explorer::starting_from(Hanoi::new(3));
        assert_eq!(explorer.pending_reveal(), 1);

        // the start position allows moving the smallest disk to either free tower
        assert!(explorer.expand_one());
        assert_eq!(explorer.len(), 3);
        assert_eq!(explorer.pending_reveal(), 3);

        let mut layout = ForceLayout::new(LayoutConfig::default());
        assert!(layout.reveal_batch(&mut explorer, 5));
        assert_eq!(layout.len(), 3);
        assert_eq!(explorer.pending_reveal(), 0);
        assert!(!layout.reveal_batch(&mut explorer, 5));

        let order = layout.bodies().map(|(id, _)| id).collect_vec();
        assert_eq!(order, vec![NodeId(0), NodeId(1), NodeId(2)]);

        let first = layout.body(NodeId(0)).unwrap();
        assert!(first.anchored);
        assert_eq!(first.position, Vec2::ZERO);
        for (_, body) in layout.bodies().skip(1) {
            assert!(!body.anchored);
            assert!(body.position.y > 0.0);
        }
    }

    #[test]
    fn reveal_batch_respects_limit() {
        let mut explorer = explored_hanoi(3);
        let mut layout = ForceLayout::new(LayoutConfig::default());

        assert!(layout.reveal_batch(&mut explorer, 10));
        assert_eq!(layout.len(), 10);
        assert_eq!(explorer.pending_reveal(), 17);
        assert!(layout.reveal_batch(&mut explorer, 100));
        assert_eq!(layout.len(), 27);
    }

    #[test]
    fn path_needs_distances() {
        let explorer = explored_hanoi(3);
        let start = explorer.start().unwrap();
        let goal = explorer.goal().unwrap();

        assert_eq!(explorer.shortest_path(start, goal), Err(ExploreError::DistancesNotComputed(goal)));
        assert!(explorer.reconstruct_shortest_path(start, goal).is_empty());
        assert_eq!(explorer.step_toward_goal(start), None);
    }

    #[test]
    fn no_goal_reachable() {
        let mut explorer = Explorer::starting_from(Ring { at: 0, size: 6, goal: None });
        explorer.run_to_exhaustion();

        assert_eq!(explorer.len(), 6);
        assert_eq!(explorer.adjacency().edge_count(), 6);
        assert_eq!(explorer.goal(), None);
        assert_eq!(explorer.compute_goal_distances(), 0);
        assert!(explorer.nodes().all(|(_, node)| node.goal_distance().is_none()));

        let start = explorer.start().unwrap();
        assert_eq!(explorer.shortest_path(start, NodeId(3)), Err(ExploreError::NoGoal));
    }

    #[test]
    fn start_is_goal() {
        let mut explorer = Explorer::starting_from(Ring { at: 2, size: 5, goal: Some(2) });
        let start = explorer.start().unwrap();

        assert_eq!(explorer.goal(), Some(start));
        assert_eq!(explorer[start].kind(), NodeKind::Start);

        explorer.run_to_exhaustion();
        assert_eq!(explorer.compute_goal_distances(), 5);
        assert_eq!(explorer[start].goal_distance(), Some(0));
        assert_eq!(explorer.shortest_path(start, start), Ok(vec![start]));
        assert_eq!(explorer.step_toward_goal(start), None);
    }

    #[test]
    fn partial_distances() {
        let mut explorer = Explorer::starting_from(Ring { at: 0, size: 10, goal: Some(1) });
        explorer.run_batch(2);
        assert_eq!(explorer.phase(), Phase::Exploring);

        // only nodes discovered so far are labeled
        let labeled = explorer.compute_goal_distances();
        assert_eq!(labeled, explorer.len());
        assert!(explorer.has_goal_distances());
    }

    #[test]
    fn update_current_position() {
        let mut explorer = explored_hanoi(2);
        let moved = Hanoi::new(2).apply(HanoiMove::ZeroToOne).unwrap();

        let id = explorer.update_current_position(&moved);
        assert_eq!(id, explorer.id_of(&moved.key()));
        assert_eq!(explorer.current(), id);

        // a position with a different disk count was never discovered
        assert_eq!(explorer.update_current_position(&Hanoi::new(3)), None);
        assert_eq!(explorer.current(), None);
    }

    #[test]
    fn iwahswap_reaches_goal() {
        let start = Iwahswap::default();
        assert_eq!(start.key().as_str(), "0,1,2,3,4,5-3");
        assert_eq!(start.rod_value(), 1);

        let mut explorer = Explorer::starting_from(start);
        explorer.run_to_exhaustion();

        assert_eq!(explorer.len(), 1368);
        assert_eq!(explorer.adjacency().edge_count(), 1599);
        assert_eq!(explorer.goal_states(), 5);

        let goal = explorer.goal().unwrap();
        assert_eq!(explorer[goal].key().as_str(), "0,5,4,3,2,1-0");
        assert_eq!(explorer.compute_goal_distances(), 1368);

        let from = explorer.start().unwrap();
        assert_eq!(explorer[from].goal_distance(), Some(169));
        assert_eq!(explorer.shortest_path(from, goal).map(|path| path.len()), Ok(170));
    }

    #[test]
    fn view_round_trip() {
        let mut transform = ViewTransform::new(VIEWPORT);
        assert_eq!(transform.project(Vec2::ZERO), Vec2::new(400.0, 300.0));

        transform.pan_by(Vec2::new(-35.0, 12.5));
        transform.zoom = 2.5;
        for world in [Vec2::ZERO, Vec2::new(17.0, -3.5), Vec2::new(-250.0, 1e4)] {
            assert!(close(transform.unproject(transform.project(world)), world));
        }
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let config = ViewConfig::default();
        let mut transform = ViewTransform::new(VIEWPORT);
        transform.pan_by(Vec2::new(40.0, -10.0));

        let anchor = Vec2::new(123.0, 456.0);
        let before = transform.unproject(anchor);
        transform.zoom_at(anchor, 1.1, config.min_zoom, config.max_zoom);
        assert!((transform.zoom - 1.1).abs() < 1e-12);
        assert!(close(transform.unproject(anchor), before));

        transform.zoom_at(anchor, 100.0, config.min_zoom, config.max_zoom);
        assert_eq!(transform.zoom, config.max_zoom);
        assert!(close(transform.unproject(anchor), before));

        transform.zoom_at(anchor, 1e-6, config.min_zoom, config.max_zoom);
        assert_eq!(transform.zoom, config.min_zoom);
    }

    #[test]
    fn wheel_zoom() {
        let mut view: GraphView<Hanoi> = GraphView::new(LayoutConfig::default(), ViewConfig::default(), VIEWPORT);
        view.on_wheel(Vec2::new(10.0, 10.0), 120.0);
        assert!((view.transform().zoom - 0.9).abs() < 1e-12);
        view.on_wheel(Vec2::new(10.0, 10.0), -120.0);
        assert!((view.transform().zoom - 0.99).abs() < 1e-12);
    }

    #[test]
    fn inverted_zoom_range_falls_back() {
        let inverted = ViewConfig { min_zoom: 5.0, max_zoom: 1.0, ..ViewConfig::default() };
        assert!(!inverted.has_valid_zoom_range());

        let defaults = ViewConfig::default();
        let mut view: GraphView<Hanoi> = GraphView::new(LayoutConfig::default(), inverted, VIEWPORT);
        for _ in 0..40 {
            view.on_wheel(Vec2::new(10.0, 10.0), -120.0);
        }
        assert_eq!(view.transform().zoom, defaults.max_zoom);
        for _ in 0..80 {
            view.on_wheel(Vec2::new(10.0, 10.0), 120.0);
        }
        assert_eq!(view.transform().zoom, defaults.min_zoom);

        let mut transform = ViewTransform::new(VIEWPORT);
        transform.zoom_at(Vec2::ZERO, 2.0, 5.0, 1.0);
        assert_eq!(transform.zoom, 1.0);
    }

    #[test]
    fn pinch_pans_and_zooms() {
        let mut view: GraphView<Hanoi> = GraphView::new(LayoutConfig::default(), ViewConfig::default(), VIEWPORT);
        view.on_pinch_start(Vec2::new(300.0, 300.0), Vec2::new(500.0, 300.0));
        assert_eq!(view.gesture(), Gesture::Pinching { distance: 200.0, midpoint: Vec2::new(400.0, 300.0) });
        let under = view.unproject_from_screen(Vec2::new(400.0, 300.0));

        // twice the spread, midpoint carried right and down
        let (a, b) = (Vec2::new(250.0, 320.0), Vec2::new(650.0, 320.0));
        view.on_pinch_move(a, b);
        assert!((view.transform().zoom - 2.0).abs() < 1e-12);
        assert!(close(view.transform().pan, Vec2::new(50.0, 20.0)));
        assert!(close(view.unproject_from_screen(a.midpoint(b)), under));

        // same spread: pan only
        let (a, b) = (Vec2::new(270.0, 330.0), Vec2::new(670.0, 330.0));
        view.on_pinch_move(a, b);
        assert!((view.transform().zoom - 2.0).abs() < 1e-12);
        assert!(close(view.transform().pan, Vec2::new(70.0, 30.0)));
        assert!(close(view.unproject_from_screen(a.midpoint(b)), under));

        view.on_pinch_end();
        assert_eq!(view.gesture(), Gesture::Idle);
    }

    #[test]
    fn normal_mode_pans() {
        let mut explorer = explored_hanoi(2);
        let mut view = revealed_view(&mut explorer);

        view.on_pointer_down(Vec2::new(100.0, 100.0));
        view.on_pointer_move(Vec2::new(150.0, 120.0));
        view.on_pointer_move(Vec2::new(160.0, 90.0));
        assert_eq!(view.on_pointer_up(&explorer, Vec2::new(160.0, 90.0)), None);

        assert_eq!(view.transform().pan, Vec2::new(60.0, -10.0));
        assert_eq!(view.gesture(), Gesture::Idle);
    }

    #[test]
    fn drag_moves_nearest_node() {
        let mut explorer = explored_hanoi(2);
        let mut view = revealed_view(&mut explorer);
        view.zoom_at(Vec2::new(400.0, 300.0), 2.0);
        view.set_mode(InteractionMode::Drag);

        let target = NodeId(4);
        let before = view.layout().position(target).unwrap();
        let at = screen_of(&view, target);

        view.on_pointer_down(at + Vec2::new(0.5, -0.5));
        assert_eq!(view.layout().held(), Some(target));
        view.on_pointer_move(at + Vec2::new(20.5, 9.5));

        // screen motion is divided by the zoom
        assert!(close(view.layout().position(target).unwrap(), before + Vec2::new(10.0, 5.0)));
        assert_eq!(view.layout().body(target).unwrap().velocity, Vec2::ZERO);

        assert_eq!(view.on_pointer_up(&explorer, at), None);
        assert_eq!(view.layout().held(), None);
        assert_eq!(view.transform().pan, Vec2::ZERO);
    }

    #[test]
    fn held_node_ignores_physics() {
        let mut explorer = explored_hanoi(2);
        let mut view = revealed_view(&mut explorer);
        view.set_mode(InteractionMode::Drag);

        let target = NodeId(5);
        let before = view.layout().position(target).unwrap();
        view.on_pointer_down(screen_of(&view, target));
        for _ in 0..10 {
            view.physics_tick(&explorer);
        }
        assert_eq!(view.layout().position(target), Some(before));

        // the anchored first node never moves on its own
        assert_eq!(view.layout().position(NodeId(0)), Some(Vec2::ZERO));
    }

    #[test]
    fn coincident_nodes_separate() {
        let mut explorer = explored_hanoi(1);
        let mut layout = ForceLayout::new(LayoutConfig::default());
        layout.reveal_batch(&mut explorer, usize::MAX);
        assert_eq!(layout.len(), 3);

        let spot = Vec2::new(100.0, 100.0);
        for id in [NodeId(1), NodeId(2)] {
            let delta = spot - layout.position(id).unwrap();
            layout.drag_by(id, delta);
        }
        assert!(close(layout.position(NodeId(1)).unwrap(), layout.position(NodeId(2)).unwrap()));

        layout.tick(&explorer);
        let cap = layout.config().max_velocity;
        for (_, body) in layout.bodies() {
            assert!(body.position.x.is_finite() && body.position.y.is_finite());
            assert!(body.velocity.length() <= cap + 1e-9);
        }
        // the push is far stronger than the cap allows
        for id in [NodeId(1), NodeId(2)] {
            assert!((layout.body(id).unwrap().velocity.length() - cap).abs() < 1e-9);
        }

        let (left, right) = (layout.position(NodeId(1)).unwrap(), layout.position(NodeId(2)).unwrap());
        assert!(right.x - left.x > cap);
    }

    #[test]
    fn velocity_is_capped() {
        let mut explorer = explored_hanoi(2);
        let config = LayoutConfig { repulsion: 1e9, ..LayoutConfig::default() };
        let mut layout = ForceLayout::new(config);
        layout.reveal_batch(&mut explorer, usize::MAX);

        for _ in 0..5 {
            layout.tick(&explorer);
            for (_, body) in layout.bodies() {
                assert!(body.velocity.length() <= config.max_velocity + 1e-9);
            }
        }
        assert!(layout.bodies().any(|(_, body)| (body.velocity.length() - config.max_velocity).abs() < 1e-9));
    }

    #[test]
    fn jump_tap_calls_back() {
        let mut explorer = explored_hanoi(2);
        let mut view = revealed_view(&mut explorer);
        view.set_mode(InteractionMode::Jump);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        view.set_jump_callback(move |state: &Hanoi| sink.borrow_mut().push(state.key()));

        let target = NodeId(3);
        let at = screen_of(&view, target);
        view.on_pointer_down(at);
        view.on_pointer_move(at + Vec2::new(3.0, 4.0));
        assert_eq!(view.on_pointer_up(&explorer, at + Vec2::new(3.0, 4.0)), Some(target));

        assert_eq!(*seen.borrow(), vec![explorer[target].key().clone()]);
        assert_eq!(view.transform().pan, Vec2::ZERO);
    }

    #[test]
    fn jump_drag_pans_instead() {
        let mut explorer = explored_hanoi(2);
        let mut view = revealed_view(&mut explorer);
        view.set_mode(InteractionMode::Jump);

        let at = screen_of(&view, NodeId(3));
        view.on_pointer_down(at);
        view.on_pointer_move(at + Vec2::new(30.0, 0.0));
        // returning near the origin does not turn the pan back into a tap
        view.on_pointer_move(at + Vec2::new(1.0, 0.0));
        assert_eq!(view.on_pointer_up(&explorer, at + Vec2::new(1.0, 0.0)), None);

        assert!(close(view.transform().pan, Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn empty_view_is_inert() {
        let explorer: Explorer<Hanoi> = Explorer::new();
        let mut view: GraphView<Hanoi> = GraphView::new(LayoutConfig::default(), ViewConfig::default(), VIEWPORT);

        assert_eq!(view.find_nearest_node(Vec2::new(400.0, 300.0)), None);
        view.physics_tick(&explorer);

        view.set_mode(InteractionMode::Drag);
        view.on_pointer_down(Vec2::new(1.0, 1.0));
        assert_eq!(view.gesture(), Gesture::Idle);

        view.set_mode(InteractionMode::Jump);
        view.on_pointer_down(Vec2::new(1.0, 1.0));
        assert_eq!(view.on_pointer_up(&explorer, Vec2::new(1.0, 1.0)), None);

        let mut list = DrawList::default();
        view.draw(&explorer, &mut list);
        assert_eq!(list.commands(), &[DrawCommand::Clear { viewport: VIEWPORT }]);
    }

    #[test]
    fn draw_marks_start_goal_and_path() {
        let mut explorer = explored_hanoi(3);
        explorer.compute_goal_distances();
        let mut view = revealed_view(&mut explorer);
        view.options_mut().goal_distances = true;

        let mut list = DrawList::default();
        view.draw(&explorer, &mut list);

        let start = screen_of(&view, explorer.start().unwrap());
        let goal = screen_of(&view, explorer.goal().unwrap());
        assert_eq!(list.circles_with_stroke(&render::START_MARKER).collect_vec(), vec![start]);
        assert_eq!(list.circles_with_stroke(&render::GOAL_MARKER).collect_vec(), vec![goal]);
        assert_eq!(list.circles_with_stroke(&render::CURRENT_MARKER).collect_vec(), vec![start]);

        let lines = list.commands().iter()
            .filter_map(|command| match command {
                DrawCommand::Line { color, .. } => Some(color),
                _ => None,
            })
            .collect_vec();
        assert_eq!(lines.len(), 39);
        assert_eq!(lines.iter().filter(|color| ***color == render::PATH_EDGE).count(), 7);

        let labels = list.commands().iter().filter(|command| matches!(command, DrawCommand::Text { .. })).count();
        assert_eq!(labels, 27);
    }

    #[test]
    fn reinitialized_explorer_resets_layout() {
        let mut explorer = explored_hanoi(3);
        explorer.compute_goal_distances();
        let mut view = revealed_view(&mut explorer);
        view.set_mode(InteractionMode::Jump);
        let at = screen_of(&view, NodeId(20));
        assert_eq!(view.layout().len(), 27);

        explorer.initialize(Hanoi::new(1));
        assert!(!view.layout().tracks(&explorer));

        let mut list = DrawList::default();
        view.draw(&explorer, &mut list);
        assert_eq!(list.commands(), &[DrawCommand::Clear { viewport: VIEWPORT }]);
        view.on_pointer_down(at);
        assert_eq!(view.on_pointer_up(&explorer, at), None);

        view.physics_tick(&explorer);
        assert!(view.layout().is_empty());
        assert!(view.layout().tracks(&explorer));

        assert!(view.reveal_batch(&mut explorer, usize::MAX));
        assert_eq!(view.layout().len(), 1);
        explorer.run_to_exhaustion();
        view.reveal_batch(&mut explorer, usize::MAX);
        view.physics_tick(&explorer);
        assert_eq!(view.layout().len(), 3);
    }

    #[test]
    fn scheduler_lifecycle() {
        let mut session = SessionBuilder::new(Hanoi::new(3)).build().unwrap();
        assert!(session.scheduler().is_idle());
        assert_eq!(session.advance(Duration::ZERO), Default::default());

        session.start(Duration::ZERO);
        for task in Task::VARIANTS {
            assert!(session.scheduler().is_running(*task));
        }

        let first = session.advance(Duration::ZERO);
        assert_eq!(first.expanded, 27);
        assert!(first.revealed);
        assert_eq!(session.view().layout().len(), 25);

        // nothing is due again until a period has passed
        assert_eq!(session.advance(Duration::from_millis(10)), Default::default());

        session.run_until_settled(Duration::from_millis(50), 100);
        assert!(!session.scheduler().is_running(Task::Explore));
        assert!(!session.scheduler().is_running(Task::Reveal));
        assert!(session.scheduler().is_running(Task::Physics));
        assert!(session.explorer().has_goal_distances());
        assert_eq!(session.view().layout().len(), 27);

        session.stop();
        assert!(session.scheduler().is_idle());
        assert_eq!(session.explorer().len(), 27);
    }

    #[test]
    fn restart_discards_everything() {
        let mut session = SessionBuilder::new(Hanoi::new(3)).build().unwrap();
        session.start(Duration::ZERO);
        session.run_until_settled(Duration::ZERO, 100);
        session.view_mut().zoom_at(Vec2::ZERO, 2.0);
        assert!(session.apply_move(HanoiMove::ZeroToTwo));

        session.restart(Hanoi::new(2), Duration::from_secs(1));
        assert_eq!(session.explorer().len(), 1);
        assert_eq!(session.explorer().phase(), Phase::Exploring);
        assert!(session.view().layout().is_empty());
        assert_eq!(session.view().transform().zoom, 1.0);
        assert!(session.scheduler().is_running(Task::Explore));

        // the player now stands on the new start
        assert_eq!(session.state(), &Hanoi::new(2));
        assert_eq!(session.history_len(), 0);
        assert!(session.explorer().current().is_some());
        assert_eq!(session.explorer().current(), session.explorer().start());
        assert!(!session.undo());

        // stale clocks fire nothing
        assert_eq!(session.advance(Duration::from_millis(500)), Default::default());

        session.run_until_settled(Duration::from_secs(1), 100);
        assert_eq!(session.explorer().len(), 9);
        for _ in 0..3 {
            assert!(session.step_toward_goal());
        }
        assert!(session.is_solved());

        session.reset();
        assert_eq!(session.state(), &Hanoi::new(2));
        assert_eq!(session.explorer().current(), session.explorer().start());
    }

    #[test]
    fn history() {
        let mut session = SessionBuilder::new(Hanoi::new(3)).build().unwrap();
        session.start(Duration::ZERO);
        session.run_until_settled(Duration::ZERO, 100);

        assert!(session.apply_move(HanoiMove::ZeroToTwo));
        assert_eq!(session.state().top(2), Some(1));
        assert_eq!(session.explorer().current(), session.explorer().id_of(&session.state().key()));

        assert!(!session.apply_move(HanoiMove::ZeroToTwo));
        assert_eq!(session.history_len(), 1);

        assert!(session.undo());
        assert_eq!(session.state(), &Hanoi::new(3));
        assert_eq!(session.explorer().current(), session.explorer().start());
        assert!(!session.undo());

        session.reset();
        assert_eq!(session.history_len(), 0);

        session.apply_move(HanoiMove::ZeroToOne);
        session.reset();
        assert_eq!(session.state(), &Hanoi::new(3));
        assert_eq!(session.history_len(), 2);
    }

    #[test]
    fn step_toward_goal_solves() {
        let mut session = SessionBuilder::new(Hanoi::new(3)).build().unwrap();
        assert!(!session.step_toward_goal());

        session.start(Duration::ZERO);
        session.run_until_settled(Duration::ZERO, 100);

        for _ in 0..7 {
            assert!(session.step_toward_goal());
        }
        assert!(session.is_solved());
        assert_eq!(session.explorer().current(), session.explorer().goal());
        assert!(!session.step_toward_goal());
        assert_eq!(session.history_len(), 7);
    }

    #[test]
    fn tap_jumps_session() {
        let mut session = SessionBuilder::new(Hanoi::new(2)).build().unwrap();
        session.start(Duration::ZERO);
        session.run_until_settled(Duration::ZERO, 100);
        session.set_mode(InteractionMode::Jump);

        let target = NodeId(7);
        let at = session.view().project_to_screen(session.view().layout().position(target).unwrap());
        session.pointer_down(at);
        assert_eq!(session.pointer_up(at), Some(target));

        assert_eq!(&session.state().key(), session.explorer()[target].key());
        assert_eq!(session.explorer().current(), Some(target));
        assert!(session.undo());
        assert_eq!(session.state(), &Hanoi::new(2));
    }

    #[test]
    fn builder_reports_first_problem() {
        let mut builder = SessionBuilder::new(Hanoi::new(1));
        builder.explore_batch(Duration::from_millis(10), 0).zoom_range(0.0, 1.0);
        assert_eq!(builder.build().err(), Some(&vec![ConfigInvalidReason::ZeroBatch(Task::Explore)]));

        let mut builder = SessionBuilder::new(Hanoi::new(1));
        builder.cadence(Task::Physics, Duration::ZERO, 1);
        assert_eq!(builder.is_valid(), Some(&vec![ConfigInvalidReason::ZeroPeriod(Task::Physics)]));

        let mut builder = SessionBuilder::new(Hanoi::new(1));
        builder.zoom_range(2.0, 1.0);
        assert_eq!(builder.is_valid(), Some(&vec![ConfigInvalidReason::BadZoomRange]));

        let mut builder = SessionBuilder::new(Hanoi::new(1));
        builder.damping(0.0);
        assert_eq!(builder.is_valid(), Some(&vec![ConfigInvalidReason::NonPositiveDamping]));

        let session = SessionBuilder::new(Hanoi::new(1))
            .viewport(320.0, 240.0)
            .reveal_batch(Duration::from_millis(5), 3)
            .seed(7)
            .build()
            .unwrap();
        assert_eq!(session.scheduler().config().reveal.batch, 3);
        assert_eq!(session.view().transform().viewport, Vec2::new(320.0, 240.0));
    }
}
