use tinsel::{
    component::Transform,
    tree::{GroupKind, Tree},
};

const DT: f32 = 1.0 / 60.0;

fn settle(tree: &mut Tree, seconds: f32) {
    let ticks = (seconds / DT) as usize;
    for _ in 0..ticks {
        tree.tick(DT);
    }
}

#[test]
fn forming_converges_every_group_onto_the_tree() {
    let mut tree = Tree::new(Some(2024));
    tree.mount();
    tree.set_formed(true);
    settle(&mut tree, 20.0);

    let buffers = tree.buffers().expect("mounted");
    for kind in GroupKind::ALL {
        let group = tree.group(kind);
        assert_eq!(group.progress(), 1.0, "{}", kind.label());

        let buffer = buffers.group(kind);
        assert_eq!(buffer.len(), group.len());

        for (i, (instance, formed)) in buffer
            .as_slice()
            .iter()
            .zip(&group.table().formed)
            .enumerate()
        {
            let rendered: Transform = instance.transform();
            // Lights keep floating a little above and below their slot.
            let tolerance = if kind == GroupKind::Lights { 0.06 } else { 1e-3 };
            assert!(
                rendered.position.abs_diff_eq(formed.position, tolerance),
                "{} #{} at {:?}, expected {:?}",
                kind.label(),
                i,
                rendered.position,
                formed.position
            );
        }
    }
}

#[test]
fn scattering_again_returns_to_the_cloud() {
    let mut tree = Tree::new(Some(7));
    tree.mount();
    tree.set_formed(true);
    settle(&mut tree, 1.0);
    tree.set_formed(false);
    settle(&mut tree, 20.0);

    let buffers = tree.buffers().expect("mounted");
    for kind in [GroupKind::Needles, GroupKind::OrnamentSpheres] {
        let group = tree.group(kind);
        assert_eq!(group.progress(), 0.0);
        for (instance, scattered) in buffers
            .group(kind)
            .as_slice()
            .iter()
            .zip(&group.table().scattered)
        {
            assert!(instance
                .transform()
                .position
                .abs_diff_eq(scattered.position, 1e-3));
        }
    }
}

#[test]
fn diamonds_leave_the_tree_from_their_spun_pose() {
    let mut tree = Tree::new(Some(3));
    tree.mount();
    tree.set_formed(true);
    settle(&mut tree, 20.0);
    assert!(tree.group(GroupKind::OrnamentDiamonds).spin() > 0.5);

    let rotations = |tree: &Tree| -> Vec<_> {
        let buffers = tree.buffers().expect("mounted");
        buffers
            .group(GroupKind::OrnamentDiamonds)
            .as_slice()
            .iter()
            .map(|instance| instance.transform().rotation)
            .collect()
    };

    let before = rotations(&tree);
    tree.set_formed(false);
    tree.tick(DT);
    let after = rotations(&tree);

    for (i, (before, after)) in before.iter().zip(&after).enumerate() {
        let turned = before.angle_between(*after);
        assert!(turned < 0.2, "diamond #{} turned {} rad", i, turned);
    }
}

#[test]
fn same_seed_builds_the_same_tree() {
    let a = Tree::new(Some(99));
    let b = Tree::new(Some(99));
    for kind in GroupKind::ALL {
        assert_eq!(a.group(kind).table(), b.group(kind).table());
    }
}

#[test]
fn dirty_buffers_upload_once_per_frame() {
    let mut tree = Tree::new(Some(11));
    tree.mount();
    tree.set_formed(true);
    tree.tick(DT);

    let buffers = tree.buffers_mut().expect("mounted");
    assert!(buffers.needles.take_dirty());
    assert!(!buffers.needles.take_dirty());
}
