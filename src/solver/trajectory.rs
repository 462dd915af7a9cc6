/// Solved samples (t_i, x_i), i = 0..n-1.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    t: Vec<f64>,
    x: Vec<f64>,
}

impl Trajectory {
    pub(crate) fn new(t: Vec<f64>, x: Vec<f64>) -> Trajectory {
        debug_assert_eq!(t.len(), x.len());
        Trajectory { t, x }
    }

    pub fn t(&self) -> &[f64] {
        &self.t
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn x0(&self) -> f64 {
        self.x[0]
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.t, self.x)
    }
}
