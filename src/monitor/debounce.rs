use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy)]
pub struct Threshold {
    pub raise: f32,
    pub hysteresis: f32,
    pub direction: Direction,
}

impl Threshold {
    pub fn above(raise: f32, hysteresis: f32) -> Self {
        Self {
            raise,
            hysteresis,
            direction: Direction::Above,
        }
    }

    pub fn below(raise: f32, hysteresis: f32) -> Self {
        Self {
            raise,
            hysteresis,
            direction: Direction::Below,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlertEvent {
    Raised { component: String, value: Option<f32> },
    Cleared { component: String, value: Option<f32> },
}

/// Per-component alert state machine: OK -> (breach) -> ALERTING ->
/// (recover past the hysteresis margin) -> OK.
///
/// Exactly one `Raised` per breach episode; repeated breaching readings are
/// absorbed. Numeric components only clear once the reading recovers past
/// `raise - hysteresis` (symmetric for `Below`), so a value oscillating at
/// the raise threshold cannot flap. Boolean health components clear
/// immediately on recovery. State entries are created lazily on first
/// observation and never removed; a component that stops being sampled
/// simply keeps its last state.
#[derive(Debug, Default)]
pub struct AlertDebouncer {
    alerting: HashMap<String, bool>,
}

impl AlertDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(
        &mut self,
        component: &str,
        value: f32,
        threshold: Threshold,
    ) -> Option<AlertEvent> {
        let breached = match threshold.direction {
            Direction::Above => value > threshold.raise,
            Direction::Below => value < threshold.raise,
        };

        let alerting = self.alerting.entry(component.to_string()).or_default();

        if breached && !*alerting {
            *alerting = true;
            return Some(AlertEvent::Raised {
                component: component.to_string(),
                value: Some(value),
            });
        }

        if !breached && *alerting {
            let recovered = match threshold.direction {
                Direction::Above => value <= threshold.raise - threshold.hysteresis,
                Direction::Below => value >= threshold.raise + threshold.hysteresis,
            };
            if recovered {
                *alerting = false;
                return Some(AlertEvent::Cleared {
                    component: component.to_string(),
                    value: Some(value),
                });
            }
        }

        None
    }

    /// Boolean health check: unhealthy is a breach, recovery clears
    /// immediately with no margin.
    pub fn evaluate_health(&mut self, component: &str, healthy: bool) -> Option<AlertEvent> {
        let alerting = self.alerting.entry(component.to_string()).or_default();

        if !healthy && !*alerting {
            *alerting = true;
            return Some(AlertEvent::Raised {
                component: component.to_string(),
                value: None,
            });
        }

        if healthy && *alerting {
            *alerting = false;
            return Some(AlertEvent::Cleared {
                component: component.to_string(),
                value: None,
            });
        }

        None
    }

    pub fn is_alerting(&self, component: &str) -> bool {
        self.alerting.get(component).copied().unwrap_or(false)
    }

    /// Components currently in the ALERTING state, sorted for stable output.
    pub fn alerting_components(&self) -> Vec<String> {
        let mut components: Vec<String> = self
            .alerting
            .iter()
            .filter(|(_, alerting)| **alerting)
            .map(|(component, _)| component.clone())
            .collect();
        components.sort();
        components
    }
}

#[cfg(test)]
mod tests {
    use super::{AlertDebouncer, AlertEvent, Threshold};

    fn raised(component: &str, value: f32) -> AlertEvent {
        AlertEvent::Raised {
            component: component.to_string(),
            value: Some(value),
        }
    }

    fn cleared(component: &str, value: f32) -> AlertEvent {
        AlertEvent::Cleared {
            component: component.to_string(),
            value: Some(value),
        }
    }

    #[test]
    fn cpu_sequence_raises_clears_and_raises_again() {
        let mut debouncer = AlertDebouncer::new();
        let threshold = Threshold::above(90.0, 10.0);

        let events: Vec<_> = [95.0, 92.0, 88.0, 79.0, 96.0]
            .into_iter()
            .filter_map(|value| debouncer.evaluate("cpu", value, threshold))
            .collect();

        assert_eq!(
            events,
            vec![raised("cpu", 95.0), cleared("cpu", 79.0), raised("cpu", 96.0)]
        );
    }

    #[test]
    fn temperature_only_clears_past_margin() {
        let mut debouncer = AlertDebouncer::new();
        let threshold = Threshold::above(50.0, 3.0);

        let events: Vec<_> = [49.0, 51.0, 48.0, 47.0]
            .into_iter()
            .filter_map(|value| debouncer.evaluate("temp:CPU", value, threshold))
            .collect();

        assert_eq!(events, vec![raised("temp:CPU", 51.0), cleared("temp:CPU", 47.0)]);
    }

    #[test]
    fn repeated_breaches_emit_a_single_raise() {
        let mut debouncer = AlertDebouncer::new();
        let threshold = Threshold::above(80.0, 5.0);

        assert!(debouncer.evaluate("ram", 85.0, threshold).is_some());
        for value in [90.0, 99.0, 81.0, 80.5] {
            assert_eq!(debouncer.evaluate("ram", value, threshold), None);
        }
        assert!(debouncer.is_alerting("ram"));
    }

    #[test]
    fn dip_back_to_exact_raise_threshold_does_not_clear() {
        let mut debouncer = AlertDebouncer::new();
        let threshold = Threshold::above(90.0, 10.0);

        debouncer.evaluate("cpu", 95.0, threshold);
        assert_eq!(debouncer.evaluate("cpu", 90.0, threshold), None);
        assert!(debouncer.is_alerting("cpu"));

        // Exactly at the margin clears (inclusive comparison).
        assert_eq!(
            debouncer.evaluate("cpu", 80.0, threshold),
            Some(cleared("cpu", 80.0))
        );
    }

    #[test]
    fn recovered_component_is_indistinguishable_from_fresh_one() {
        let mut debouncer = AlertDebouncer::new();
        let threshold = Threshold::above(90.0, 10.0);

        debouncer.evaluate("cpu", 95.0, threshold);
        debouncer.evaluate("cpu", 70.0, threshold);

        assert!(!debouncer.is_alerting("cpu"));
        assert!(debouncer.alerting_components().is_empty());
        assert_eq!(
            debouncer.evaluate("cpu", 95.0, threshold),
            Some(raised("cpu", 95.0))
        );
    }

    #[test]
    fn below_direction_is_symmetric() {
        let mut debouncer = AlertDebouncer::new();
        let threshold = Threshold::below(20.0, 5.0);

        assert_eq!(
            debouncer.evaluate("disk-free", 15.0, threshold),
            Some(raised("disk-free", 15.0))
        );
        // Back above the raise threshold but inside the margin: still alerting.
        assert_eq!(debouncer.evaluate("disk-free", 22.0, threshold), None);
        assert_eq!(
            debouncer.evaluate("disk-free", 25.0, threshold),
            Some(cleared("disk-free", 25.0))
        );
    }

    #[test]
    fn health_component_clears_immediately_on_recovery() {
        let mut debouncer = AlertDebouncer::new();

        assert!(matches!(
            debouncer.evaluate_health("service:nginx", false),
            Some(AlertEvent::Raised { .. })
        ));
        assert_eq!(debouncer.evaluate_health("service:nginx", false), None);
        assert!(matches!(
            debouncer.evaluate_health("service:nginx", true),
            Some(AlertEvent::Cleared { .. })
        ));
        assert_eq!(debouncer.evaluate_health("service:nginx", true), None);
    }

    #[test]
    fn missing_component_raises_once_per_disappearance() {
        let mut debouncer = AlertDebouncer::new();

        assert!(debouncer.evaluate_health("container:redis", false).is_some());
        assert_eq!(debouncer.evaluate_health("container:redis", false), None);

        assert!(debouncer.evaluate_health("container:redis", true).is_some());
        assert!(debouncer.evaluate_health("container:redis", false).is_some());
    }

    #[test]
    fn components_are_tracked_independently() {
        let mut debouncer = AlertDebouncer::new();
        let threshold = Threshold::above(90.0, 5.0);

        debouncer.evaluate("disk:/", 95.0, threshold);
        debouncer.evaluate("disk:/home", 50.0, threshold);

        assert_eq!(debouncer.alerting_components(), vec!["disk:/".to_string()]);
    }
}
