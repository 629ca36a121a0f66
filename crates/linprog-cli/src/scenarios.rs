//! The demo models. Each entry point builds and solves one problem and hands
//! it back for reporting.

use linprog_model::{Category, LinearExpression, ModelError, Problem, Sense, VariableFamily};
use linprog_solver::{Backend, SolverConfig};

/// Runs the model on `backend` with `config`
pub struct Runner<'a> {
    pub backend: &'a dyn Backend,
    pub config: SolverConfig,
}

impl Runner<'_> {
    fn solve(&self, mut problem: Problem) -> Result<Problem, ModelError> {
        problem.set_config(self.config.clone());
        problem.solve_with(self.backend)?;
        Ok(problem)
    }

    /// Minimize 3x - 5y subject to y <= x, with x >= 0 and integer y <= 5
    pub fn simple_minimization(&self) -> Result<Problem, ModelError> {
        let mut problem = Problem::minimize("Simple Minimization");

        let x = problem.add_variable("x", Some(0.0), None, Category::Continuous)?;
        let y = problem.add_variable("y", None, Some(5.0), Category::Integer)?;

        let objective = LinearExpression::term(&x, 3.0).sub(&LinearExpression::term(&y, 5.0));
        problem.set_objective(Sense::Minimize, objective)?;
        problem.add_constraint(LinearExpression::from(&y).less_or_equal_expr(&LinearExpression::from(&x)))?;

        self.solve(problem)
    }

    /// Maximize total utility of four goods under a unit cost budget
    pub fn maximize_utility(&self) -> Result<Problem, ModelError> {
        let items = [1, 2, 3, 4];
        let costs = [0.05, 0.02, 0.07, 0.09];
        let utilities = [10.0, 8.0, 15.0, 20.0];

        let mut problem = Problem::maximize("Maximize Utility");
        let vars = problem.add_variable_family("X", items, Some(0.0), Some(20.0), Category::Continuous)?;

        problem.set_objective(Sense::Maximize, LinearExpression::dot(vars.variables(), utilities))?;
        problem.add_named_constraint("budget", LinearExpression::dot(vars.variables(), costs).less_or_equal(1.0))?;

        self.solve(problem)
    }

    /// Cheapest hourly schedule for household appliances under a power cap
    pub fn appliance_schedule(&self) -> Result<Schedule, ModelError> {
        let mut problem = Problem::minimize("Appliance Schedule");

        let keys = APPLIANCES
            .iter()
            .flat_map(|appliance| STEPS.iter().map(move |&step| (appliance.name, step)));
        let on = problem.add_variable_family("on", keys, None, None, Category::Binary)?;

        let mut cost = LinearExpression::new();
        for appliance in &APPLIANCES {
            for ((_, step), var) in on.iter().filter(|((name, _), _)| *name == appliance.name) {
                cost = cost.with_term(var, PRICES[*step as usize] * appliance.power);
            }
        }
        problem.set_objective(Sense::Minimize, cost)?;

        for appliance in &APPLIANCES {
            let running = LinearExpression::sum(
                on.iter()
                    .filter(|((name, _), _)| *name == appliance.name)
                    .map(|(_, var)| var),
            );
            problem.add_named_constraint(
                &format!("run_{}", appliance.name),
                running.equal_to(appliance.steps),
            )?;
        }
        for &step in &STEPS {
            // family order is appliance-major, so the filtered cells line up with APPLIANCES
            let load = LinearExpression::dot(
                on.iter().filter(|((_, s), _)| *s == step).map(|(_, var)| var),
                APPLIANCES.iter().map(|a| a.power),
            );
            problem.add_named_constraint(&format!("cap_{}", step), load.less_or_equal(POWER_CAP))?;
        }

        let problem = self.solve(problem)?;
        Ok(Schedule { problem, on })
    }
}

pub struct Appliance {
    pub name: &'static str,
    /// kW drawn while running
    pub power: f64,
    /// Time steps the appliance must run
    pub steps: f64,
}

pub static APPLIANCES: [Appliance; 3] = [
    Appliance { name: "washer", power: 0.5, steps: 2.0 },
    Appliance { name: "dryer", power: 3.0, steps: 2.0 },
    Appliance { name: "dishwasher", power: 1.2, steps: 1.0 },
];

pub static STEPS: [u32; 7] = [0, 1, 2, 3, 4, 5, 6];

/// Energy price per kW for each step
pub static PRICES: [f64; 7] = [0.30, 0.25, 0.10, 0.08, 0.12, 0.28, 0.35];

pub const POWER_CAP: f64 = 3.5;

pub struct Schedule {
    pub problem: Problem,
    /// Keyed by (appliance, step)
    pub on: VariableFamily<(&'static str, u32)>,
}

impl Schedule {
    pub fn appliance_names() -> Vec<&'static str> {
        APPLIANCES.iter().map(|a| a.name).collect()
    }
}
