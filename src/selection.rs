use crate::models::{Instance, SelectionAlgorithm};

/// Pick the instance to auto-join under `algorithm`.
///
/// Full instances are never picked. `Custom` has no built-in strategy and
/// always yields `None`. Ties keep the earlier instance in listing order.
pub fn pick_instance(algorithm: SelectionAlgorithm, instances: &[Instance]) -> Option<&Instance> {
    let open = instances.iter().filter(|i| !i.is_full());

    match algorithm {
        SelectionAlgorithm::AlphabeticalByWorldId => open.reduce(|best, i| {
            if (&i.world_id, &i.instance_id) < (&best.world_id, &best.instance_id) {
                i
            } else {
                best
            }
        }),
        SelectionAlgorithm::MostRecentlyCreated => {
            open.reduce(|best, i| if i.created_at > best.created_at { i } else { best })
        }
        SelectionAlgorithm::MostUsers => {
            open.reduce(|best, i| if i.user_count > best.user_count { i } else { best })
        }
        SelectionAlgorithm::FewestUsers => {
            open.reduce(|best, i| if i.user_count < best.user_count { i } else { best })
        }
        SelectionAlgorithm::Custom => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstanceType;
    use chrono::{TimeDelta, Utc};

    fn instance(world: &str, id: &str, users: u32, capacity: u32, age_min: i64) -> Instance {
        Instance {
            world_id: world.into(),
            instance_id: id.into(),
            name: format!("{world} {id}"),
            user_count: users,
            capacity,
            created_at: Utc::now() - TimeDelta::minutes(age_min),
            instance_type: InstanceType::Group,
        }
    }

    fn listing() -> Vec<Instance> {
        vec![
            instance("wrld_b", "1", 15, 32, 30),
            instance("wrld_a", "2", 8, 24, 15),
            instance("wrld_c", "3", 5, 16, 45),
            instance("wrld_0", "4", 20, 20, 1),
        ]
    }

    fn pick_id(algorithm: SelectionAlgorithm) -> Option<String> {
        pick_instance(algorithm, &listing()).map(|i| i.instance_id.clone())
    }

    #[test]
    fn test_algorithms() {
        assert_eq!(pick_id(SelectionAlgorithm::AlphabeticalByWorldId).as_deref(), Some("2"));
        assert_eq!(pick_id(SelectionAlgorithm::MostRecentlyCreated).as_deref(), Some("2"));
        assert_eq!(pick_id(SelectionAlgorithm::MostUsers).as_deref(), Some("1"));
        assert_eq!(pick_id(SelectionAlgorithm::FewestUsers).as_deref(), Some("3"));
        assert_eq!(pick_id(SelectionAlgorithm::Custom), None);
    }

    #[test]
    fn test_ties_keep_listing_order() {
        let list = vec![instance("wrld_x", "first", 8, 32, 10), instance("wrld_y", "second", 8, 32, 20)];
        let picked = pick_instance(SelectionAlgorithm::MostUsers, &list).unwrap();
        assert_eq!(picked.instance_id, "first");
        let picked = pick_instance(SelectionAlgorithm::FewestUsers, &list).unwrap();
        assert_eq!(picked.instance_id, "first");
    }

    #[test]
    fn test_empty_or_all_full() {
        assert!(pick_instance(SelectionAlgorithm::MostUsers, &[]).is_none());
        let full = vec![instance("wrld_a", "1", 16, 16, 5)];
        assert!(pick_instance(SelectionAlgorithm::FewestUsers, &full).is_none());
    }
}
