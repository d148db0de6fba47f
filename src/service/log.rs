use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter, info};
use std::io::Write;
use std::future::{ready, Ready};
use std::time::Instant;
use actix_web::{
   dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
   Error,
};
use futures_util::future::LocalBoxFuture;

pub struct LoggerMiddleware;

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
   S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
   S::Future: 'static,
   B: 'static,
{
   type Response = ServiceResponse<B>;
   type Error = Error;
   type InitError = ();
   type Transform = LoggerMiddlewareService<S>;
   type Future = Ready<Result<Self::Transform, Self::InitError>>;

   fn new_transform(&self, service: S) -> Self::Future {
      ready(Ok(LoggerMiddlewareService { service }))
   }
}

pub struct LoggerMiddlewareService<S> {
   service: S
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
   type Response = ServiceResponse<B>;
   type Error = Error;
   type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

   forward_ready!(service);

   fn call(&self, req: ServiceRequest) -> Self::Future {
      let started = Instant::now();
      let route = format!("{} {}", req.method(), req.uri());
      let fut = self.service.call(req);

      Box::pin(async move {
         let res = fut.await?;
         info!("{} -> {} in {:?}", route, res.status(), started.elapsed());
         Ok(res)
      })
   }
}

fn paint(level: Level) -> colored::ColoredString {
   let label = level.as_str();
   match level {
      Level::Error => label.red().bold(),
      Level::Warn => label.yellow().bold(),
      Level::Info => label.green().bold(),
      Level::Debug => label.blue().bold(),
      Level::Trace => label.magenta().bold(),
   }
}

/// `RUST_LOG` wins over the `info` default.
pub fn init_logger() {
   Builder::new()
   .filter_level(LevelFilter::Info)
   .parse_default_env()
   .format(|buf, record| {
      writeln!(buf, "{} [{}] {}", paint(record.level()), record.target(), record.args())
   })
   .init()
}
