use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use canonlp_solver::{
    CanonicalProblem, DualProblem, LpProblem, Phase, ProblemError, SimplexObserver, Solution,
    SolutionStatus, Solver, Tableau,
};

#[derive(Parser)]
#[command(name = "canonlp")]
#[command(about = "Canonical form, simplex and duality for linear programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Maximum pivots per simplex phase
    #[arg(long, global = true, default_value_t = 10000)]
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    #[arg(long, global = true, default_value_t = canonlp_solver::DEFAULT_TOLERANCE)]
    tolerance: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form and initial tableau of a problem
    Canonical {
        /// JSON problem file
        file: PathBuf,
    },
    /// Solve a problem and print the optimal solution
    Solve {
        /// JSON problem file
        file: PathBuf,
        /// Print the tableau at every iteration
        #[arg(short, long)]
        trace: bool,
    },
    /// Build the dual of a problem and solve it
    Dual {
        /// JSON problem file
        file: PathBuf,
        /// Print the tableau at every iteration
        #[arg(short, long)]
        trace: bool,
    },
    /// Check a problem file for errors
    Check {
        /// JSON problem file
        file: PathBuf,
    },
}

/// Prints every tableau the solver passes through
struct TablePrinter;

impl SimplexObserver for TablePrinter {
    fn on_iteration(&mut self, phase: Phase, iteration: usize, tableau: &Tableau) {
        let label = match phase {
            Phase::Feasibility => "Phase 1 iteration",
            Phase::Optimization => "Iteration",
        };
        println!("{} {}:", label, iteration);
        println!("{}", tableau);
        println!();
    }
}

fn load_problem(file: &Path) -> Result<LpProblem, String> {
    let source = std::fs::read_to_string(file).map_err(|e| format!("Error reading file: {}", e))?;
    parse_problem(&source)
}

fn parse_problem(source: &str) -> Result<LpProblem, String> {
    let mut problem: LpProblem =
        serde_json::from_str(source).map_err(|e| format!("Parse error: {}", e))?;

    // Omitted flags mean no free variables
    if problem.free.is_empty() {
        problem.free = vec![false; problem.num_variables()];
    }

    problem.validate().map_err(|e| format!("Invalid problem: {}", e))?;
    Ok(problem)
}

fn load_or_exit(file: &Path) -> LpProblem {
    match load_problem(file) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn solve_or_exit(result: Result<Solution, ProblemError>) -> Solution {
    match result {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Solver error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the status line; exits unless the solution is optimal
fn report_status(solution: &Solution, what: &str) {
    match solution.status {
        SolutionStatus::Optimal => println!("Status: OPTIMAL"),
        SolutionStatus::Unbounded => {
            println!("Status: UNBOUNDED");
            println!("The {} problem has no finite optimal solution.", what);
            std::process::exit(1);
        }
        SolutionStatus::Infeasible => {
            println!("Status: INFEASIBLE");
            println!("No solution exists that satisfies all {} constraints.", what);
            std::process::exit(1);
        }
        SolutionStatus::IterationLimit => {
            println!("Status: ITERATION LIMIT");
            println!("Stopped after {} pivots without reaching an optimum.", solution.iterations);
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::builder().parse_env("CANONLP_LOG").init();

    let cli = Cli::parse();
    let solver = Solver::new()
        .with_max_iterations(cli.max_iterations)
        .with_tolerance(cli.tolerance);

    match cli.command {
        Commands::Canonical { file } => {
            let problem = load_or_exit(&file);
            let canonical = match CanonicalProblem::from_problem(&problem) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Invalid problem: {}", e);
                    std::process::exit(1);
                }
            };

            println!("Canonical form:");
            println!("{}", canonical);
            println!();
            println!("Initial tableau:");
            println!("{}", Tableau::from_canonical(&canonical));
        }
        Commands::Solve { file, trace } => {
            let problem = load_or_exit(&file);
            info!(
                "Solving {} with {} variables and {} constraints",
                file.display(),
                problem.num_variables(),
                problem.num_constraints()
            );

            let solution = if trace {
                solve_or_exit(solver.solve_observed(&problem, &mut TablePrinter))
            } else {
                solve_or_exit(solver.solve(&problem))
            };

            report_status(&solution, "primal");
            println!("Objective: {}", solution.objective_value);
            println!("Pivots: {}", solution.iterations);
            println!();
            println!("Variables:");
            for (i, value) in solution.values.iter().enumerate() {
                println!("  x{:<4} {:12.6}", i + 1, value);
            }
        }
        Commands::Dual { file, trace } => {
            let problem = load_or_exit(&file);
            let dual = match DualProblem::from_primal(&problem) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("Invalid problem: {}", e);
                    std::process::exit(1);
                }
            };

            println!("Dual form:");
            println!("{}", dual);
            println!();

            let solution = if trace {
                solve_or_exit(solver.solve_observed(&dual.problem, &mut TablePrinter))
            } else {
                solve_or_exit(solver.solve(&dual.problem))
            };

            report_status(&solution, "dual");
            println!("Optimal value of dual problem: {}", solution.objective_value);
            println!(
                "Implied primal optimum: {}",
                dual.primal_objective(solution.objective_value)
            );
            let values: Vec<String> = solution.values.iter().map(|v| v.to_string()).collect();
            println!("Dual solution: {}", values.join(" "));
        }
        Commands::Check { file } => match load_problem(&file) {
            Ok(problem) => {
                let free = problem.free.iter().filter(|&&f| f).count();
                println!("✓ {} is valid", file.display());
                println!("  {} variables ({} free)", problem.num_variables(), free);
                println!("  {} constraints", problem.num_constraints());
                println!("  objective: {:?}", problem.sense());
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", file.display());
                eprintln!("  {}", e);
                std::process::exit(1);
            }
        },
    }
}
