//! Behavioural tests for relation hydration through an in-memory store.

use std::cell::RefCell;

use osmgraph_core::{
    Entity, Hydrator, Member, MemberRef, MemberTarget, MemoryEntityStore, MetaInfo, Node,
    Relation, RelationBean, Tags, Way,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Shared state for hydration scenarios.
#[derive(Debug, Default)]
struct HydrationWorld {
    store: RefCell<MemoryEntityStore>,
    result: RefCell<Option<Option<RelationBean>>>,
}

impl HydrationWorld {
    fn load(&self, entities: Vec<Entity>) {
        self.store.replace(MemoryEntityStore::from_entities(entities));
    }

    fn hydrate(&self, id: i64) {
        let bean = {
            let store = self.store.borrow();
            Hydrator::new(&*store).relation(id).expect("in-memory lookups never fail")
        };
        self.result.replace(Some(bean));
    }

    fn bean(&self) -> RelationBean {
        self.result
            .borrow()
            .clone()
            .expect("hydration was attempted")
            .expect("relation should exist")
    }
}

#[fixture]
fn world() -> HydrationWorld {
    HydrationWorld::default()
}

fn node(id: i64) -> Entity {
    Entity::Node(Node {
        id,
        meta: MetaInfo::default(),
        tags: Tags::new(),
        latitude: 51.5,
        longitude: -0.1,
    })
}

fn way(id: i64, node_ids: Vec<i64>) -> Entity {
    Entity::Way(Way {
        id,
        meta: MetaInfo::default(),
        tags: Tags::from([("railway".to_owned(), "rail".to_owned())]),
        node_ids,
    })
}

fn relation(id: i64, members: Vec<Member>) -> Entity {
    Entity::Relation(Relation {
        id,
        meta: MetaInfo::default(),
        tags: Tags::from([("public_transport".to_owned(), "stop_area".to_owned())]),
        members,
    })
}

#[given("a store holding a stop area relation with a platform node and a track way")]
fn given_stop_area(world: &HydrationWorld) {
    world.load(vec![
        node(5),
        node(1),
        node(2),
        way(6, vec![1, 2]),
        relation(
            20,
            vec![
                Member::new(MemberRef::Node(5), "platform"),
                Member::new(MemberRef::Way(6), "stop"),
            ],
        ),
    ]);
}

#[given("a store holding a relation whose way member is absent")]
fn given_dangling(world: &HydrationWorld) {
    world.load(vec![
        node(5),
        relation(
            20,
            vec![
                Member::new(MemberRef::Way(404), "outer"),
                Member::new(MemberRef::Node(5), "label"),
            ],
        ),
    ]);
}

#[given("a store holding relations 1, 2 and 3 referencing each other in a loop")]
fn given_cycle(world: &HydrationWorld) {
    world.load(vec![
        relation(1, vec![Member::new(MemberRef::Relation(2), "")]),
        relation(2, vec![Member::new(MemberRef::Relation(3), "")]),
        relation(3, vec![Member::new(MemberRef::Relation(1), "")]),
    ]);
}

#[when("I hydrate relation 20")]
fn when_hydrate_20(world: &HydrationWorld) {
    world.hydrate(20);
}

#[when("I hydrate relation 1")]
fn when_hydrate_1(world: &HydrationWorld) {
    world.hydrate(1);
}

#[when("I hydrate relation 404")]
fn when_hydrate_404(world: &HydrationWorld) {
    world.hydrate(404);
}

#[then("the relation has 2 members in declared order")]
fn then_two_members(world: &HydrationWorld) {
    let bean = world.bean();
    let roles: Vec<_> = bean.members.iter().map(|m| m.role.as_str()).collect();
    assert_eq!(roles, vec!["platform", "stop"]);
    assert!(matches!(bean.members[0].target, MemberTarget::Node(_)));
}

#[then("the track way resolves both of its nodes")]
fn then_way_nodes(world: &HydrationWorld) {
    let bean = world.bean();
    let MemberTarget::Way(track) = &bean.members[1].target else {
        panic!("second member should be a way");
    };
    let ids: Vec<_> = track.nodes.iter().flatten().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[then("the absent member is reported as missing")]
fn then_missing(world: &HydrationWorld) {
    let bean = world.bean();
    assert_eq!(bean.members[0].target, MemberTarget::Missing);
    assert_eq!(bean.members[0].reference, MemberRef::Way(404));
}

#[then("the remaining members still resolve")]
fn then_rest_resolves(world: &HydrationWorld) {
    let bean = world.bean();
    assert!(bean.members[1].target.is_resolved());
}

#[then("the innermost back reference is marked as a cycle")]
fn then_cycle(world: &HydrationWorld) {
    let bean = world.bean();
    let MemberTarget::Relation(second) = &bean.members[0].target else {
        panic!("relation 2 should resolve");
    };
    let MemberTarget::Relation(third) = &second.members[0].target else {
        panic!("relation 3 should resolve");
    };
    assert_eq!(third.id, 3);
    assert_eq!(third.members[0].target, MemberTarget::Cycle);
}

#[then("no bean is produced")]
fn then_nothing(world: &HydrationWorld) {
    let result = world.result.borrow();
    assert!(matches!(*result, Some(None)), "unknown relation should hydrate to None");
}

#[scenario(path = "tests/features/hydration.feature", index = 0)]
fn resolving_stop_area(world: HydrationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/hydration.feature", index = 1)]
fn tolerating_dangling_references(world: HydrationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/hydration.feature", index = 2)]
fn terminating_on_cycles(world: HydrationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/hydration.feature", index = 3)]
fn unknown_relation(world: HydrationWorld) {
    let _ = world;
}
