/*
Automation Timeline
===================

An `AudioParam` is a value that changes over time according to a list of
scheduled events, all expressed on the audio clock (seconds). Nothing here
touches a real clock: callers ask "what is the value at t?" and get an answer
computed from the event list.

Event kinds
-----------

    SetValue    { value, time }                jump to `value` at `time`
    LinearRamp  { value, end_time }            straight line from the previous
                                               point to (end_time, value)
    Target      { target, start_time, tau }    exponential approach from the
                                               value at start_time:

        v(t) = target + (v0 - target) · e^(-(t - start_time) / tau)

Walking the list
----------------

Events are kept sorted by their time (a ramp's time is its END). The value at
t is found by folding over the events in order, carrying the "previous point"
(time, value):

    value
      ▲         SetValue      LinearRamp end
    1 ┤            ●─────────────────●
      │           ╱                  ╲
    0 ┤──anchor──╯                     ╲___ Target approaching 0 ...
      └────────────────────────────────────────▶ t

A ramp starts wherever the previous event left off. A Target runs until the
next event begins. A ramp right after a Target starts at the Target's start
time, so the Target contributes nothing.

Equal timestamps keep insertion order: the later-scheduled event wins.

Collapsing
----------

Events in the past are folded into a single "anchor" point at block
boundaries so the list never grows without bound.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamEvent {
    SetValue {
        value: f32,
        time: f64,
    },
    LinearRamp {
        value: f32,
        end_time: f64,
    },
    Target {
        target: f32,
        start_time: f64,
        time_constant: f64,
    },
}

impl ParamEvent {
    /// Sort key on the timeline.
    pub fn time(&self) -> f64 {
        match *self {
            ParamEvent::SetValue { time, .. } => time,
            ParamEvent::LinearRamp { end_time, .. } => end_time,
            ParamEvent::Target { start_time, .. } => start_time,
        }
    }

    /// When this event begins to influence the value.
    fn begins(&self, previous_time: f64) -> f64 {
        match *self {
            ParamEvent::LinearRamp { .. } => previous_time,
            _ => self.time(),
        }
    }
}

#[inline]
fn approach(from: f32, target: f32, elapsed: f64, time_constant: f64) -> f32 {
    if time_constant <= 0.0 {
        return target;
    }
    let decay = (-elapsed / time_constant).exp() as f32;
    target + (from - target) * decay
}

#[derive(Debug, Clone)]
pub struct AudioParam {
    anchor_time: f64,
    anchor_value: f32,
    events: Vec<ParamEvent>,
}

impl AudioParam {
    pub fn new(value: f32) -> Self {
        Self {
            anchor_time: 0.0,
            anchor_value: value,
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[ParamEvent] {
        &self.events
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) {
        self.insert(ParamEvent::SetValue { value, time });
    }

    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, end_time: f64) {
        self.insert(ParamEvent::LinearRamp { value, end_time });
    }

    pub fn set_target_at_time(&mut self, target: f32, start_time: f64, time_constant: f64) {
        self.insert(ParamEvent::Target {
            target,
            start_time,
            time_constant,
        });
    }

    /// Drop every event scheduled at or after `time`.
    pub fn cancel_scheduled_values(&mut self, time: f64) {
        self.events.retain(|event| event.time() < time);
    }

    /// The value automation eventually settles on.
    pub fn final_value(&self) -> f32 {
        match self.events.last() {
            Some(ParamEvent::SetValue { value, .. }) => *value,
            Some(ParamEvent::LinearRamp { value, .. }) => *value,
            Some(ParamEvent::Target { target, .. }) => *target,
            None => self.anchor_value,
        }
    }

    pub fn value_at(&self, t: f64) -> f32 {
        let mut value = self.anchor_value;
        let mut time = self.anchor_time;

        for (i, event) in self.events.iter().enumerate() {
            match *event {
                ParamEvent::SetValue { value: v, time: at } => {
                    if at > t {
                        break;
                    }
                    value = v;
                    time = at;
                }
                ParamEvent::LinearRamp { value: v, end_time } => {
                    if end_time <= t {
                        value = v;
                        time = end_time;
                    } else {
                        if t <= time {
                            return value;
                        }
                        let progress = ((t - time) / (end_time - time)) as f32;
                        return value + (v - value) * progress;
                    }
                }
                ParamEvent::Target {
                    target,
                    start_time,
                    time_constant,
                } => {
                    if start_time > t {
                        break;
                    }
                    let end = self
                        .events
                        .get(i + 1)
                        .map_or(f64::INFINITY, |next| next.begins(start_time));
                    if t < end {
                        return approach(value, target, t - start_time, time_constant);
                    }
                    value = approach(value, target, end - start_time, time_constant);
                    time = end;
                }
            }
        }

        value
    }

    /// Fold events that lie entirely before `t` into the anchor point.
    pub fn collapse(&mut self, t: f64) {
        let Some(last_past) = self.events.iter().rposition(|event| event.time() <= t) else {
            return;
        };

        match self.events[last_past] {
            ParamEvent::SetValue { value, time } => {
                self.anchor_time = time;
                self.anchor_value = value;
                self.events.drain(..=last_past);
            }
            ParamEvent::LinearRamp { value, end_time } => {
                self.anchor_time = end_time;
                self.anchor_value = value;
                self.events.drain(..=last_past);
            }
            ParamEvent::Target { start_time, .. } => {
                // Keep the Target itself; it is still approaching.
                let start_value = self.value_at(start_time);
                self.anchor_time = start_time;
                self.anchor_value = start_value;
                self.events.drain(..last_past);
            }
        }
    }

    fn insert(&mut self, event: ParamEvent) {
        let at = event.time();
        let index = self
            .events
            .iter()
            .position(|existing| existing.time() > at)
            .unwrap_or(self.events.len());
        self.events.insert(index, event);
    }
}
