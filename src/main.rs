fn main() {
    use ansible_roles_graph::{app, cli};
    let cli = cli::parse();
    app::init_tracing(cli.verbose, cli.quiet);
    let code = app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
