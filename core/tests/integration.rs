use pipeplan_core::planner::bounds::RawParameters;
use pipeplan_core::{
    Allocator, Bottleneck, Configuration, Infeasible, Parameters, ThroughputModel,
    TrainerCapacity,
};

fn reference_params() -> Parameters {
    Parameters {
        total_gpus: 16,
        trainer_gpus_per_replica: 4.0,
        trainer_capacity: TrainerCapacity::trajectories(5.0),
        inference_gpus_per_replica: 1.0,
        inference_reqs_per_s_per_replica: 2000.0,
        actor_steps_per_traj: 30.0,
        actor_steps_per_s: 4.0,
    }
}

fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0)
}

#[cfg(test)]
mod throughput_tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_reference_scenario() -> Result<()> {
        let model = ThroughputModel::new(reference_params());
        let report = model.evaluate(&Configuration::new(8.0, 8.0, 32.0))?;

        assert_eq!(report.trainer_replicas, 2);
        assert_eq!(report.inference_replicas, 8);
        assert!(approx(report.generation_demand, 128.0));
        assert!(approx(report.inference_capacity, 16000.0));
        assert!(approx(report.generation_rate, 128.0));
        assert!(approx(report.rollout_traj_rate, 128.0 / 30.0));
        assert!(approx(report.trainer_traj_rate, 10.0));
        assert!(approx(report.trajectories_per_second, 128.0 / 30.0));
        assert!(approx(report.samples_per_second, 128.0));
        assert_eq!(report.bottleneck, Bottleneck::Actors);
        Ok(())
    }

    #[test]
    fn test_steps_unit_matches_trajectory_unit() -> Result<()> {
        let mut params = reference_params();
        params.trainer_capacity = TrainerCapacity::steps(150.0);
        let report = ThroughputModel::new(params).evaluate(&Configuration::new(8.0, 8.0, 32.0))?;
        assert!(approx(report.trainer_traj_rate, 10.0));
        Ok(())
    }

    #[test]
    fn test_precondition_order() {
        let model = ThroughputModel::new(reference_params());
        let cases = [
            (Configuration::new(-1.0, 8.0, 32.0), Infeasible::InvalidGpuSplit),
            (Configuration::new(8.0, -1.0, 32.0), Infeasible::InvalidGpuSplit),
            (Configuration::new(10.0, 7.0, 0.0), Infeasible::InvalidGpuSplit),
            (Configuration::new(f64::NAN, 7.0, 32.0), Infeasible::InvalidGpuSplit),
            (Configuration::new(3.0, 0.0, 0.0), Infeasible::NoTrainer),
            (Configuration::new(4.0, 0.0, 0.0), Infeasible::NoInference),
            (Configuration::new(4.0, 1.0, 0.0), Infeasible::NoActors),
            (Configuration::new(4.0, 1.0, -2.0), Infeasible::NoActors),
            (Configuration::new(4.0, 1.0, f64::NAN), Infeasible::NoActors),
            (Configuration::new(4.0, 1.0, f64::INFINITY), Infeasible::NoActors),
        ];
        for (config, expected) in cases {
            assert_eq!(model.evaluate(&config), Err(expected), "config {:?}", config);
        }
    }

    #[test]
    fn test_oversubscribed_split_ignores_actors() {
        let model = ThroughputModel::new(reference_params());
        for actors in [0.0, 1.0, 32.0, 1e9, f64::NAN] {
            assert_eq!(
                model.evaluate(&Configuration::new(9.0, 8.0, actors)),
                Err(Infeasible::InvalidGpuSplit)
            );
        }
    }

    #[test]
    fn test_zero_actors_always_rejected() {
        let model = ThroughputModel::new(reference_params());
        for (gt, gi) in [(4.0, 1.0), (8.0, 8.0), (12.0, 4.0)] {
            assert_eq!(
                model.evaluate(&Configuration::new(gt, gi, 0.0)),
                Err(Infeasible::NoActors)
            );
        }
    }

    #[test]
    fn test_env_bottleneck_when_demand_meets_capacity() -> Result<()> {
        let mut params = reference_params();
        params.inference_reqs_per_s_per_replica = 120.0;
        // 30 actors * 4 steps/s == 1 replica * 120 steps/s
        let report = ThroughputModel::new(params).evaluate(&Configuration::new(8.0, 1.0, 30.0))?;
        assert_eq!(report.bottleneck, Bottleneck::Env);
        assert!(approx(report.trajectories_per_second, 4.0));
        Ok(())
    }

    #[test]
    fn test_inference_bottleneck() -> Result<()> {
        let mut params = reference_params();
        params.inference_reqs_per_s_per_replica = 120.0;
        let report = ThroughputModel::new(params).evaluate(&Configuration::new(8.0, 1.0, 100.0))?;
        assert_eq!(report.bottleneck, Bottleneck::Inference);
        assert!(approx(report.generation_rate, 120.0));
        Ok(())
    }

    #[test]
    fn test_trainer_bottleneck() -> Result<()> {
        let model = ThroughputModel::new(reference_params());
        let report = model.evaluate(&Configuration::new(4.0, 12.0, 1000.0))?;
        assert_eq!(report.bottleneck, Bottleneck::Trainer);
        assert!(approx(report.trajectories_per_second, 5.0));
        assert!(approx(report.samples_per_second, 150.0));
        Ok(())
    }

    #[test]
    fn test_more_inference_capacity_never_lowers_throughput() -> Result<()> {
        let config = Configuration::new(8.0, 2.0, 500.0);
        let mut previous = 0.0;
        for reqs in [10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0] {
            let mut params = reference_params();
            params.inference_reqs_per_s_per_replica = reqs;
            let report = ThroughputModel::new(params).evaluate(&config)?;
            assert!(report.trajectories_per_second >= previous);
            previous = report.trajectories_per_second;
        }
        Ok(())
    }

    #[test]
    fn test_samples_scale_with_trajectory_length() -> Result<()> {
        let model = ThroughputModel::new(reference_params());
        for (gt, gi, actors) in [(4.0, 12.0, 5.0), (8.0, 8.0, 32.0), (12.0, 4.0, 113.0)] {
            let report = model.evaluate(&Configuration::new(gt, gi, actors))?;
            assert!(approx(report.samples_per_second, report.trajectories_per_second * 30.0));
        }
        Ok(())
    }

    #[test]
    fn test_fractional_replica_costs_divide_exactly() -> Result<()> {
        let mut params = reference_params();
        params.inference_gpus_per_replica = 0.1;
        let report = ThroughputModel::new(params).evaluate(&Configuration::new(4.0, 0.3, 1.0))?;
        assert_eq!(report.inference_replicas, 3);
        Ok(())
    }
}

#[cfg(test)]
mod allocator_tests {
    use super::*;
    use anyhow::{anyhow, Result};

    #[test]
    fn test_best_config_for_reference_pool() -> Result<()> {
        let allocator = Allocator::from_params(reference_params());
        let best = allocator.compute_best_config().ok_or_else(|| anyhow!("expected a split"))?;

        // 12..=15 trainer GPUs all reach 15 traj/s; the lowest share wins
        assert_eq!(best.config.trainer_gpus, 12.0);
        assert_eq!(best.config.inference_gpus, 4.0);
        assert_eq!(best.config.actors, 113.0);
        assert!(approx(best.trajectories_per_second, 15.0));
        assert!(approx(best.samples_per_second, 450.0));
        assert_eq!(best.bottleneck, Bottleneck::Trainer);
        Ok(())
    }

    #[test]
    fn test_best_config_reproduces_through_evaluate() -> Result<()> {
        let variants = [
            reference_params(),
            Parameters { total_gpus: 64, inference_reqs_per_s_per_replica: 150.0, ..reference_params() },
            Parameters { total_gpus: 9, trainer_gpus_per_replica: 2.0, ..reference_params() },
            Parameters { trainer_capacity: TrainerCapacity::steps(900.0), ..reference_params() },
        ];
        for params in variants {
            let allocator = Allocator::from_params(params.clone());
            let best = allocator.compute_best_config().ok_or_else(|| anyhow!("no split"))?;
            let again = ThroughputModel::new(params).evaluate(&best.config)?;
            assert_eq!(again, best);
        }
        Ok(())
    }

    #[test]
    fn test_best_is_max_of_sweep() -> Result<()> {
        let params = Parameters { total_gpus: 40, inference_reqs_per_s_per_replica: 90.0, ..reference_params() };
        let allocator = Allocator::from_params(params);
        let sweep = allocator.sweep();
        assert_eq!(sweep.len(), 39);

        let best = allocator.compute_best_config().ok_or_else(|| anyhow!("no split"))?;
        for partition in &sweep {
            assert_eq!(partition.trainer_gpus + partition.inference_gpus, 40);
            if let Some(report) = partition.report() {
                assert!(report.samples_per_second <= best.samples_per_second);
            }
        }
        Ok(())
    }

    #[test]
    fn test_sweep_marks_splits_without_replicas() {
        let allocator = Allocator::from_params(reference_params());
        let sweep = allocator.sweep();
        assert_eq!(sweep[0].trainer_gpus, 1);
        assert_eq!(sweep[0].outcome, Err(Infeasible::NoTrainer));
        assert_eq!(sweep[0].actors_needed, None);
        assert!(sweep[3].report().is_some());
    }

    #[test]
    fn test_actor_sizing_saturates_slower_stage() {
        let allocator = Allocator::from_params(reference_params());
        // 3 trainer replicas vs 4 inference replicas: trainer side caps at 15 traj/s
        let rate = allocator.max_rollout_traj_rate(3, 4);
        assert!(approx(rate, 15.0));
        assert_eq!(allocator.actors_needed(rate), 113.0);
        assert_eq!(allocator.actors_needed(0.0), 1.0);
    }

    #[test]
    fn test_no_feasible_configuration() {
        let single = Parameters { total_gpus: 1, ..reference_params() };
        assert!(Allocator::from_params(single).compute_best_config().is_none());

        let too_small = Parameters { total_gpus: 4, ..reference_params() };
        assert!(Allocator::from_params(too_small).compute_best_config().is_none());
    }
}

#[cfg(test)]
mod bounding_tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_garbage_input_still_evaluates() -> Result<()> {
        let raw = RawParameters {
            total_gpus: Some(f64::NAN),
            trainer_gpus_per_replica: Some(-4.0),
            inference_reqs_per_s_per_replica: Some(f64::INFINITY),
            actor_steps_per_traj: Some(0.0),
            actor_steps_per_s: None,
            ..Default::default()
        };
        let params = raw.bounded();
        assert_eq!(params.total_gpus, 16);
        assert_eq!(params.trainer_gpus_per_replica, 0.125);
        assert_eq!(params.inference_reqs_per_s_per_replica, 1e7);
        assert_eq!(params.actor_steps_per_traj, 1.0);

        let best = Allocator::from_params(params).compute_best_config();
        assert!(best.is_some());
        Ok(())
    }
}
