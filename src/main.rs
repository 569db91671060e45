use env_logger::Env;
use jiff::Zoned;
use privat_rates::{Cli, collect_rates, print_rates};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    // Bad arguments are reported on the console only; the exit status stays 0
    let args = match Cli::try_parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => {
            if let Err(e) = e.print() {
                log::error!("failed to write usage: {e}");
            }
            return;
        }
    };

    let client = args.client();
    let today = Zoned::now().date();
    let rates = collect_rates(&client, today, args.days, &args.currencies());
    if let Err(e) = print_rates(&rates) {
        log::error!("failed to write rates: {e}");
    }
}
